//! 行协议（Line Protocol）数据模型和编码
//!
//! 格式：`measurement[,tag_key=tag_val,...] field_key=field_val[,...] timestamp`

mod encoder;
mod point;
pub(crate) mod rules;
mod value;

pub use encoder::*;
pub use point::*;
pub use value::*;
