use log::LevelFilter;
use quill::{Entity, SqlEnum};
use std::env;
use time::PrimitiveDateTime;

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

#[derive(SqlEnum, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[quill(rename_all = "UPPERCASE")]
pub enum Sex {
    #[default]
    Male,
    Female,
    #[quill(rename = "X")]
    Other,
}

#[derive(Entity, Debug, Default, Clone, PartialEq)]
#[quill(table = "s_user")]
pub struct User {
    #[quill(id = "uid")]
    pub u_id: i32,
    #[quill(column = "u_name")]
    pub uname: Option<String>,
    #[quill(column)]
    pub sex: Option<Sex>,
    #[quill(column = "created_at")]
    pub created: Option<PrimitiveDateTime>,
    /// Only ever populated from query results.
    pub nickname: String,
    #[quill(ignore)]
    pub selected: bool,
}

impl User {
    pub fn new(u_id: i32, uname: Option<&str>) -> Self {
        Self {
            u_id,
            uname: uname.map(Into::into),
            ..Default::default()
        }
    }
}
