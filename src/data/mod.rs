//! 数据写入和查询

mod query;
mod write_lp;

pub use query::*;
pub use write_lp::*;
