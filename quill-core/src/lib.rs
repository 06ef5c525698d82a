mod as_value;
mod coercion;
mod criteria;
mod cursor;
mod dao;
mod entity;
mod error;
mod executor;
mod mapping;
mod metadata;
mod processor;
mod row;
mod sql_writer;
mod statement;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use coercion::*;
pub use criteria::*;
pub use cursor::*;
pub use dao::*;
pub use entity::*;
pub use error::*;
pub use executor::*;
pub use mapping::*;
pub use metadata::*;
pub use processor::*;
pub use row::*;
pub use sql_writer::*;
pub use statement::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
