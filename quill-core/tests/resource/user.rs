use log::LevelFilter;
use quill_core::{AsValue, Entity, EntityDescriptor, FieldDef, OrmError, Result, Value};
use std::{env, sync::LazyLock};

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Table `s_user`: key `uid` on `u_id`, column `u_name` on `uname`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct User {
    pub u_id: i32,
    pub uname: Option<String>,
    /// Not mapped to any column.
    pub nickname: String,
}

impl Entity for User {
    fn descriptor() -> &'static EntityDescriptor {
        static DESCRIPTOR: LazyLock<EntityDescriptor> = LazyLock::new(|| EntityDescriptor {
            name: "User",
            table: Some("s_user"),
            fields: vec![
                FieldDef::new("u_id", i32::as_empty_value()).id("uid"),
                FieldDef::new("uname", String::as_empty_value())
                    .column("u_name")
                    .nullable(true),
                FieldDef::new("nickname", String::as_empty_value()),
            ]
            .into_boxed_slice(),
        });
        &DESCRIPTOR
    }

    fn get_field(&self, field: &str) -> Option<Value> {
        match field {
            "u_id" => Some(self.u_id.as_value()),
            "uname" => Some(self.uname.clone().as_value()),
            "nickname" => Some(self.nickname.clone().as_value()),
            _ => None,
        }
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "u_id" => {
                self.u_id = if value.is_null() {
                    0
                } else {
                    i32::try_from_value(value)?
                }
            }
            "uname" => self.uname = Option::<String>::try_from_value(value)?,
            "nickname" => {
                self.nickname = if value.is_null() {
                    String::new()
                } else {
                    String::try_from_value(value)?
                }
            }
            _ => return Err(OrmError::Mapping(format!("`User` has no field `{field}`")).into()),
        }
        Ok(())
    }
}

impl User {
    pub fn new(u_id: i32, uname: Option<&str>) -> Self {
        Self {
            u_id,
            uname: uname.map(Into::into),
            nickname: String::new(),
        }
    }
}
