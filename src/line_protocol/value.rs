use std::fmt::{Display, Formatter};

/// 数据点中标签和字段的值
///
/// `Null` 表示缺失的值，编码时会被直接丢弃。`Raw` 是无法归类的值，编码时原样输出。
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PointValue {
    #[default]
    Null,
    Integer(i64),
    UInteger(u64),
    Float(f64),
    Boolean(bool),
    String(String),
    Raw(String),
}

impl PointValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// 默认的字符串转换。`Null` 转换为空字符串
impl Display for PointValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(n) => write!(f, "{}", n),
            Self::UInteger(n) => write!(f, "{}", n),
            Self::Float(d) => write!(f, "{}", d),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::String(s) | Self::Raw(s) => write!(f, "{}", s),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty => $variant:ident),*) => {
        $(
            impl From<$t> for PointValue {
                fn from(value: $t) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_from_int!(i8 => Integer, i16 => Integer, i32 => Integer, i64 => Integer, u8 => UInteger, u16 => UInteger, u32 => UInteger, u64 => UInteger);

impl From<f32> for PointValue {
    fn from(value: f32) -> Self {
        Self::Float(value.into())
    }
}

impl From<f64> for PointValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PointValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<String> for PointValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for PointValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<&String> for PointValue {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl<T> From<Option<T>> for PointValue
where
    T: Into<PointValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// 从 JSON 值转换。数组和对象没有对应的类型，保留其 JSON 文本
impl From<serde_json::Value> for PointValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInteger(u)
                } else {
                    n.as_f64().map(Self::Float).unwrap_or_else(|| Self::Raw(n.to_string()))
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            other => Self::Raw(other.to_string()),
        }
    }
}

impl From<&serde_json::Value> for PointValue {
    fn from(value: &serde_json::Value) -> Self {
        value.clone().into()
    }
}
