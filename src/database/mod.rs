//! 数据库管理

mod list_database;
mod test_connection;

pub use list_database::*;
pub use test_connection::*;
