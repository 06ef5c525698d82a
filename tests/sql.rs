mod resource {
    pub mod user;
}

#[cfg(test)]
mod tests {
    use crate::resource::user::{Sex, User, init_logs};
    use quill::{
        Criteria, Entity, GenericSqlWriter, Mapping, OrmError, SqlWriter, Statement, Value,
    };
    use time::macros::datetime;

    const WRITER: GenericSqlWriter = GenericSqlWriter {};

    #[derive(Entity, Debug, Default)]
    #[quill(table = "accounts")]
    struct Account {
        #[quill(id = "id")]
        id: Option<i64>,
        #[quill(id = "region")]
        region: String,
        #[quill(column = "display_name")]
        name: String,
        #[quill(column)]
        balance: Option<f64>,
    }

    fn assert_consistent(statement: &Statement) {
        assert_eq!(
            statement.placeholders(),
            statement.params.len(),
            "{statement}"
        );
    }

    #[test]
    fn user_statements() {
        init_logs();
        let mapping = Mapping::new();
        let user = User {
            sex: Some(Sex::Female),
            created: Some(datetime!(2024-01-01 9:00)),
            ..User::new(10, Some("Jane"))
        };

        let insert = WRITER.write_insert(&mapping, &user).unwrap();
        assert_eq!(
            insert.text,
            "insert into s_user (u_name, sex, created_at, uid) values (?, ?, ?, ?)"
        );
        assert_eq!(
            insert.params[1],
            Value::Enum(Some("FEMALE".into()), &["MALE", "FEMALE", "X"])
        );
        assert_eq!(
            insert.params[2],
            Value::Timestamp(Some(datetime!(2024-01-01 9:00)))
        );
        assert_consistent(&insert);

        let update = WRITER.write_update_all(&mapping, &user).unwrap();
        assert_eq!(
            update.text,
            "update s_user set u_name =?, sex =?, created_at =? where uid =?"
        );
        assert_eq!(update.params[3], Value::Int32(Some(10)));
        assert_consistent(&update);

        let update = WRITER
            .write_update_selected(&mapping, &User::new(10, Some("Jane")))
            .unwrap();
        assert_eq!(update.text, "update s_user set u_name =? where uid =?");
        assert_consistent(&update);

        let delete = WRITER
            .write_delete(&mapping, &User::new(10, None))
            .unwrap();
        assert_eq!(delete.text, "delete from s_user where uid =?");
        assert_consistent(&delete);

        let select = WRITER
            .write_select_one(&mapping, &User::new(10, None))
            .unwrap();
        assert_eq!(
            select.text,
            "select tb.u_name uname, tb.sex sex, tb.created_at created, tb.uid u_id from s_user tb where uid =?"
        );
        assert_consistent(&select);

        let select = WRITER
            .write_select_many(
                &mapping,
                &User {
                    sex: Some(Sex::Other),
                    ..Default::default()
                },
            )
            .unwrap();
        // Zero is not null, the key still filters
        assert_eq!(
            select.text,
            "select tb.u_name uname, tb.sex sex, tb.created_at created, tb.uid u_id from s_user tb where sex =? and uid =?"
        );
        assert_eq!(select.params[1], Value::Int32(Some(0)));
        assert_consistent(&select);
    }

    #[test]
    fn criteria_statement() {
        let mapping = Mapping::new();
        let criteria = Criteria::new()
            .like("u_name", "an")
            .equal("sex", Sex::Male)
            .is_null("created_at");
        let select = WRITER
            .write_select_by_criteria::<User>(&mapping, &criteria)
            .unwrap();
        assert!(select.text.ends_with(
            "from s_user tb where u_name like ? and sex =? and created_at is null"
        ));
        assert_eq!(
            select.params,
            [
                Value::Varchar(Some("%an%".into())),
                Value::Enum(Some("MALE".into()), &["MALE", "FEMALE", "X"]),
            ]
        );
        assert_consistent(&select);
    }

    #[test]
    fn composite_key() {
        let mapping = Mapping::new();
        let account = Account {
            id: Some(1),
            region: "eu".into(),
            name: "main".into(),
            balance: None,
        };
        let update = WRITER.write_update_all(&mapping, &account).unwrap();
        assert_eq!(
            update.text,
            "update accounts set display_name =?, balance =? where id =? and region =?"
        );
        assert_eq!(
            update.params,
            [
                Value::Varchar(Some("main".into())),
                Value::Float64(None),
                Value::Int64(Some(1)),
                Value::Varchar(Some("eu".into())),
            ]
        );
        let update = WRITER.write_update_selected(&mapping, &account).unwrap();
        assert_eq!(
            update.text,
            "update accounts set display_name =? where id =? and region =?"
        );
        let select = WRITER.write_select_one(&mapping, &account).unwrap();
        assert!(select.text.ends_with("where id =? and region =?"));
        assert_consistent(&select);
    }

    #[test]
    fn absent_key() {
        let mapping = Mapping::new();
        let account = Account {
            id: None,
            region: "eu".into(),
            name: "main".into(),
            balance: Some(2.5),
        };
        let missing = |result: quill::Result<Statement>| {
            matches!(
                result.unwrap_err().downcast_ref::<OrmError>(),
                Some(OrmError::MissingKey(table)) if table == "accounts"
            )
        };
        assert!(missing(WRITER.write_update_all(&mapping, &account)));
        // A partial key would match every row of the region
        assert!(missing(WRITER.write_select_one(&mapping, &account)));
        assert!(missing(WRITER.write_update_selected(&mapping, &account)));
        let insert = WRITER.write_insert(&mapping, &account).unwrap();
        assert_eq!(
            insert.text,
            "insert into accounts (display_name, balance, id, region) values (?, ?, ?, ?)"
        );
        assert_eq!(insert.params[2], Value::Int64(None));

        let nothing = Account::default();
        assert!(missing(WRITER.write_update_all(&mapping, &nothing)));
        // Empty strings are values, only the absent id is skipped
        let delete = WRITER.write_delete(&mapping, &nothing).unwrap();
        assert_eq!(
            delete.text,
            "delete from accounts where display_name =? and region =?"
        );
    }

    #[test]
    fn statement_text() {
        let statement = Statement::new("select 1 from dual where a =?").bind(5);
        assert_eq!(statement.to_string(), "select 1 from dual where a =?");
        assert_consistent(&statement);
        let long = Statement::new(format!("select {}", "x".repeat(1000)));
        assert_eq!(long.to_string().chars().count(), 500);
    }
}
