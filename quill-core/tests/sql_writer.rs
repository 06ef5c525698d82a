mod resource {
    pub mod user;
}

#[cfg(test)]
mod tests {
    use crate::resource::user::{User, init_logs};
    use indoc::indoc;
    use quill_core::{
        Criteria, Entity, EntityDescriptor, FieldDef, GenericSqlWriter, Mapping, OrmError, Result,
        SqlWriter, Value,
    };
    use std::sync::LazyLock;

    const WRITER: GenericSqlWriter = GenericSqlWriter;

    fn error_of(result: Result<quill_core::Statement>) -> OrmError {
        result
            .unwrap_err()
            .downcast_ref::<OrmError>()
            .cloned()
            .expect("Expected an OrmError")
    }

    #[test]
    fn insert() {
        init_logs();
        let mapping = Mapping::new();
        let query = WRITER
            .write_insert(&mapping, &User::new(1, Some("Jane")))
            .unwrap();
        assert_eq!(query.text, "insert into s_user (u_name, uid) values (?, ?)");
        assert_eq!(
            query.params,
            [Value::Varchar(Some("Jane".into())), Value::Int32(Some(1))]
        );
        // Null values are bound, not skipped
        let query = WRITER.write_insert(&mapping, &User::new(2, None)).unwrap();
        assert_eq!(query.placeholders(), 2);
        assert_eq!(query.params[0], Value::Varchar(None));
    }

    #[test]
    fn update_all() {
        let mapping = Mapping::new();
        let query = WRITER
            .write_update_all(&mapping, &User::new(1, None))
            .unwrap();
        assert_eq!(query.text, "update s_user set u_name =? where uid =?");
        assert_eq!(query.params, [Value::Varchar(None), Value::Int32(Some(1))]);
        let query = WRITER
            .write_update_all(&mapping, &User::new(1, Some("jane")))
            .unwrap();
        assert_eq!(query.text, "update s_user set u_name =? where uid =?");
        assert_eq!(
            query.params,
            [Value::Varchar(Some("jane".into())), Value::Int32(Some(1))]
        );
    }

    #[test]
    fn update_selected() {
        let mapping = Mapping::new();
        let query = WRITER
            .write_update_selected(&mapping, &User::new(1, Some("Jane")))
            .unwrap();
        assert_eq!(query.text, "update s_user set u_name =? where uid =?");
        assert_eq!(query.placeholders(), query.params.len());
        assert!(matches!(
            error_of(WRITER.write_update_selected(&mapping, &User::new(1, None))),
            OrmError::EmptyUpdate(table) if table == "s_user"
        ));
    }

    #[test]
    fn delete() {
        let mapping = Mapping::new();
        let query = WRITER.write_delete(&mapping, &User::new(1, None)).unwrap();
        assert_eq!(query.text, "delete from s_user where uid =?");
        assert_eq!(query.params, [Value::Int32(Some(1))]);
        let query = WRITER
            .write_delete(&mapping, &User::new(1, Some("Jane")))
            .unwrap();
        assert_eq!(query.text, "delete from s_user where u_name =? and uid =?");
    }

    #[test]
    fn select_one() {
        let mapping = Mapping::new();
        let query = WRITER
            .write_select_one(&mapping, &User::new(1, Some("ignored")))
            .unwrap();
        assert_eq!(
            query.text,
            "select tb.u_name uname, tb.uid u_id from s_user tb where uid =?"
        );
        assert_eq!(query.params, [Value::Int32(Some(1))]);
    }

    #[test]
    fn select_many() {
        let mapping = Mapping::new();
        let query = WRITER
            .write_select_many(&mapping, &User::new(7, Some("Jane")))
            .unwrap();
        assert_eq!(
            query.text,
            "select tb.u_name uname, tb.uid u_id from s_user tb where u_name =? and uid =?"
        );
        assert_eq!(query.params.len(), 2);
    }

    #[test]
    fn select_by_criteria() {
        let mapping = Mapping::new();
        let criteria = Criteria::new().like("name", "a").is_null("sex");
        let query = WRITER
            .write_select_by_criteria::<User>(&mapping, &criteria)
            .unwrap();
        assert_eq!(
            query.text,
            "select tb.u_name uname, tb.uid u_id from s_user tb where name like ? and sex is null"
        );
        assert_eq!(query.params, [Value::Varchar(Some("%a%".into()))]);
        let query = WRITER
            .write_select_by_criteria::<User>(&mapping, &Criteria::new())
            .unwrap();
        assert_eq!(query.text, "select tb.u_name uname, tb.uid u_id from s_user tb");
        assert!(query.params.is_empty());
    }

    #[derive(Default)]
    struct Counter {
        hits: i64,
    }

    impl Entity for Counter {
        fn descriptor() -> &'static EntityDescriptor {
            static DESCRIPTOR: LazyLock<EntityDescriptor> = LazyLock::new(|| EntityDescriptor {
                name: "Counter",
                table: Some("counters"),
                fields: vec![FieldDef::new("hits", Value::Int64(None)).column("hits")]
                    .into_boxed_slice(),
            });
            &DESCRIPTOR
        }

        fn get_field(&self, field: &str) -> Option<Value> {
            (field == "hits").then(|| Value::Int64(Some(self.hits)))
        }

        fn set_field(&mut self, _field: &str, value: Value) -> Result<()> {
            self.hits = quill_core::AsValue::try_from_value(value)?;
            Ok(())
        }
    }

    #[derive(Default)]
    struct KeyOnly {
        id: i32,
    }

    impl Entity for KeyOnly {
        fn descriptor() -> &'static EntityDescriptor {
            static DESCRIPTOR: LazyLock<EntityDescriptor> = LazyLock::new(|| EntityDescriptor {
                name: "KeyOnly",
                table: Some("keys"),
                fields: vec![FieldDef::new("id", Value::Int32(None)).id("id")].into_boxed_slice(),
            });
            &DESCRIPTOR
        }

        fn get_field(&self, field: &str) -> Option<Value> {
            (field == "id").then(|| Value::Int32(Some(self.id)))
        }

        fn set_field(&mut self, _field: &str, value: Value) -> Result<()> {
            self.id = quill_core::AsValue::try_from_value(value)?;
            Ok(())
        }
    }

    #[test]
    fn missing_key_and_empty_update() {
        let mapping = Mapping::new();
        assert_eq!(
            error_of(WRITER.write_update_all(&mapping, &Counter { hits: 3 })),
            OrmError::MissingKey("counters".into())
        );
        assert_eq!(
            error_of(WRITER.write_update_selected(&mapping, &Counter { hits: 3 })),
            OrmError::MissingKey("counters".into())
        );
        assert_eq!(
            error_of(WRITER.write_select_one(&mapping, &Counter { hits: 3 })),
            OrmError::MissingKey("counters".into())
        );
        assert_eq!(
            error_of(WRITER.write_update_all(&mapping, &KeyOnly { id: 1 })),
            OrmError::EmptyUpdate("keys".into())
        );
        // Without any filter every row would match
        let query = WRITER
            .write_select_many(&mapping, &KeyOnly { id: 1 })
            .unwrap();
        assert_eq!(query.text, "select tb.id id from keys tb where id =?");
        let query = WRITER.write_insert(&mapping, &KeyOnly { id: 4 }).unwrap();
        assert_eq!(query.text, "insert into keys (id) values (?)");
    }

    /// Declares `secret` but never exposes it.
    #[derive(Default)]
    struct Sealed {
        id: i32,
    }

    impl Entity for Sealed {
        fn descriptor() -> &'static EntityDescriptor {
            static DESCRIPTOR: LazyLock<EntityDescriptor> = LazyLock::new(|| EntityDescriptor {
                name: "Sealed",
                table: Some("sealed"),
                fields: vec![
                    FieldDef::new("secret", Value::Varchar(None)).column("secret"),
                    FieldDef::new("id", Value::Int32(None)).id("id"),
                ]
                .into_boxed_slice(),
            });
            &DESCRIPTOR
        }

        fn get_field(&self, field: &str) -> Option<Value> {
            (field == "id").then(|| Value::Int32(Some(self.id)))
        }

        fn set_field(&mut self, _field: &str, value: Value) -> Result<()> {
            self.id = quill_core::AsValue::try_from_value(value)?;
            Ok(())
        }
    }

    #[test]
    fn unreadable_field() {
        let mapping = Mapping::new();
        let sealed = Sealed { id: 1 };
        for result in [
            WRITER.write_insert(&mapping, &sealed),
            WRITER.write_update_all(&mapping, &sealed),
            WRITER.write_delete(&mapping, &sealed),
        ] {
            assert!(matches!(error_of(result), OrmError::Mapping(..)));
        }
    }

    struct QuotingWriter;

    impl SqlWriter for QuotingWriter {
        fn table_alias(&self) -> &str {
            "t"
        }

        fn write_identifier(&self, out: &mut String, value: &str) {
            out.push('"');
            out.push_str(&value.replace('"', "\"\""));
            out.push('"');
        }
    }

    #[test]
    fn custom_writer() {
        let mapping = Mapping::new();
        let writer = QuotingWriter;
        let query = writer
            .write_update_all(&mapping, &User::new(3, Some("x")))
            .unwrap();
        assert_eq!(query.text, r#"update "s_user" set "u_name" =? where "uid" =?"#);
        let query = writer
            .write_select_one(&mapping, &User::new(3, None))
            .unwrap();
        assert_eq!(
            query.text,
            r#"select t."u_name" "uname", t."uid" "u_id" from "s_user" t where "uid" =?"#
        );
    }

    #[test]
    fn statement_display_is_truncated() {
        let long = format!("select {}", "a, ".repeat(300));
        let statement = quill_core::Statement::new(long.clone());
        let shown = statement.to_string();
        assert!(shown.ends_with("..."));
        assert!(shown.len() < long.len());
        let statement = quill_core::Statement::new("select 1").bind(1).bind("x");
        assert_eq!(statement.to_string(), "select 1");
        assert_eq!(statement.params.len(), 2);
        assert_eq!(statement.placeholders(), 0);
        let statement = quill_core::Statement::new(indoc! {"
            select uid, u_name
            from s_user
            where uid =? or u_name like ?
        "})
        .bind(1)
        .bind("%a%");
        assert_eq!(statement.placeholders(), statement.params.len());
        assert!(statement.to_string().starts_with("select uid, u_name\nfrom s_user"));
    }
}
