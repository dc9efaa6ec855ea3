/// 写入时使用的时间精度，固定为纳秒
pub const PRECISION: &str = "nanosecond";

/// 验证度量名称。不能为空。
///
/// 注意：度量名称和标签键都不做转义，包含逗号或者空格时生成的行协议是有问题的。
pub fn validate_measurement(name: &str) -> bool {
    !name.is_empty()
}

/// 判断字符串是否能解析成有限的浮点数。这样的字符串字段按数字写入，不加引号
pub fn is_numeric_string(s: &str) -> bool {
    s.parse::<f64>().map(|d| d.is_finite()).unwrap_or(false)
}

/// 标签值中需要转义的字符：逗号和空白字符
pub fn is_tag_value_special_char(c: char) -> bool {
    c == ',' || c.is_whitespace()
}
