#[cfg(test)]
mod tests {
    use quill_core::{Criteria, Operator, Value};

    #[test]
    fn criteria_empty() {
        let criteria = Criteria::new();
        assert!(criteria.is_empty());
        assert_eq!(criteria.len(), 0);
        assert_eq!(criteria.to_string(), "");
        assert!(criteria.params().is_empty());
    }

    #[test]
    fn criteria_like_and_null() {
        let criteria = Criteria::new().like("name", "a").is_null("sex");
        assert_eq!(criteria.len(), 2);
        assert_eq!(criteria.to_string(), "name like ? and sex is null");
        assert_eq!(criteria.params(), [Value::Varchar(Some("%a%".into()))]);
        assert_eq!(criteria.predicates()[0].operator, Operator::Like);
        assert_eq!(criteria.predicates()[1].value, None);
    }

    #[test]
    fn criteria_keeps_order() {
        let criteria = Criteria::new()
            .equal("age", 30)
            .is_null("deleted")
            .equal("city", "Rome")
            .like("nick", 7);
        assert_eq!(
            criteria.to_string(),
            "age =? and deleted is null and city =? and nick like ?"
        );
        assert_eq!(
            criteria.params(),
            [
                Value::Int32(Some(30)),
                Value::Varchar(Some("Rome".into())),
                Value::Varchar(Some("%7%".into())),
            ]
        );
    }

    #[test]
    fn operator_text() {
        assert_eq!(Operator::Equal.to_string(), "=?");
        assert_eq!(Operator::Like.as_str(), "like ?");
        assert_eq!(Operator::IsNull.as_str(), "is null");
        assert!(Operator::Equal.binds());
        assert!(Operator::Like.binds());
        assert!(!Operator::IsNull.binds());
    }
}
