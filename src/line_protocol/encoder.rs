use std::fmt::Write;

use crate::{error::InfluxError, InfluxResult};

use super::{
    rules::{is_numeric_string, is_tag_value_special_char, validate_measurement},
    DataPoint, PointValue,
};

/// 将一批数据点编码成行协议文本，每个数据点一行，行之间用 `\n` 分隔，末尾没有换行。
///
/// 所有行使用同一个纳秒时间戳 `timestamp`。
///
/// - 空的数据点列表返回 [`InfluxError::EmptyBatch`]
/// - 度量名称为空，或者过滤之后没有任何字段的数据点返回 [`InfluxError::InvalidPoint`]
///
/// # Examples
///
/// ```
/// use eav_influxdb_rs::line_protocol::{encode, DataPoint};
///
/// let p = DataPoint::new("sensor_data")
///     .tag("sensor_id", "s1")
///     .tag("key", "temperature")
///     .field("value", 25.5);
///
/// let text = encode(&[p], 1700000000000000000).unwrap();
/// assert_eq!("sensor_data,sensor_id=s1,key=temperature value=25.5 1700000000000000000", text);
/// ```
pub fn encode(points: &[DataPoint], timestamp: i64) -> InfluxResult<String> {
    if points.is_empty() {
        return Err(InfluxError::EmptyBatch);
    }

    let mut out = String::new();

    for (index, point) in points.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }

        encode_point(point, timestamp, &mut out).map_err(|reason| InfluxError::InvalidPoint {
            index,
            measurement: point.measurement.clone(),
            reason,
        })?;
    }

    Ok(out)
}

impl DataPoint {
    /// 把单个数据点编码成一行行协议文本
    pub fn to_line(&self, timestamp: i64) -> InfluxResult<String> {
        encode(std::slice::from_ref(self), timestamp)
    }
}

fn encode_point(point: &DataPoint, timestamp: i64, out: &mut String) -> Result<(), String> {
    if !validate_measurement(&point.measurement) {
        return Err("measurement name can not be empty".to_string());
    }

    let fields = point
        .fields
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| encode_field_value(k, v).map(|s| format!("{}={}", k, s)))
        .collect::<Result<Vec<_>, _>>()?;

    if fields.is_empty() {
        return Err("no field left after dropping null values".to_string());
    }

    out.push_str(&point.measurement);

    let tags = point
        .tags
        .iter()
        .filter(|(_, v)| !is_empty_tag_value(v))
        .map(|(k, v)| format!("{}={}", k, escape_tag_value(&v.to_string())))
        .collect::<Vec<_>>();

    if !tags.is_empty() {
        out.push(',');
        out.push_str(&tags.join(","));
    }

    out.push(' ');
    out.push_str(&fields.join(","));

    // 写入 String 不会失败
    let _ = write!(out, " {}", timestamp);

    Ok(())
}

fn is_empty_tag_value(value: &PointValue) -> bool {
    match value {
        PointValue::Null => true,
        PointValue::String(s) | PointValue::Raw(s) => s.is_empty(),
        _ => false,
    }
}

/// 标签值中的逗号和空白字符前面加上 `\`
pub(crate) fn escape_tag_value(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());

    for c in s.chars() {
        if is_tag_value_special_char(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// 字符串字段值：加上双引号，内部的双引号前面加上 `\`
pub(crate) fn quote_field_string(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}

fn encode_field_value(key: &str, value: &PointValue) -> Result<String, String> {
    let s = match value {
        PointValue::Integer(n) => n.to_string(),
        PointValue::UInteger(n) => n.to_string(),

        PointValue::Float(d) => {
            if !d.is_finite() {
                return Err(format!("field `{}` is not a finite number: {}", key, d));
            }
            d.to_string()
        }

        PointValue::Boolean(b) => b.to_string(),

        // 看起来像数字的字符串按数字写入
        PointValue::String(s) if is_numeric_string(s) => s.clone(),
        PointValue::String(s) => quote_field_string(s),

        PointValue::Raw(s) => {
            log::debug!("field `{}` falls back to raw text: {}", key, s);
            s.clone()
        }

        PointValue::Null => return Err(format!("field `{}` is null", key)),
    };

    Ok(s)
}

#[cfg(test)]
mod test_encoder {
    use crate::{error::InfluxError, line_protocol::{DataPoint, PointValue}};

    use super::{encode, escape_tag_value, quote_field_string};

    const TS: i64 = 1700000000000000000;

    #[test]
    fn test_sensor_reading() {
        let p = DataPoint::new("sensor_data")
            .tag("sensor_id", "s1")
            .tag("key", "temperature")
            .field("value", 25.5);

        assert_eq!(
            "sensor_data,sensor_id=s1,key=temperature value=25.5 1700000000000000000",
            encode(&[p], TS).unwrap()
        );
    }

    #[test]
    fn test_string_field_without_tags() {
        let p = DataPoint::new("sensor_data").field("status", "active");
        assert_eq!("sensor_data status=\"active\" 42", encode(&[p], 42).unwrap());
    }

    #[test]
    fn test_numeric_string_is_bare() {
        let p = DataPoint::new("sensor_data")
            .field("value", "25.5")
            .field("count", "7")
            .field("big", "1e3");

        let line = encode(&[p], TS).unwrap();
        assert_eq!("sensor_data value=25.5,count=7,big=1e3 1700000000000000000", line);
        assert!(!line.contains('"'));
    }

    #[test]
    fn test_numbers_are_never_quoted() {
        let p = DataPoint::new("m")
            .field("i", -12i64)
            .field("u", 12u64)
            .field("f", 0.25f64)
            .field("whole", 3.0f64);

        let line = encode(&[p], TS).unwrap();
        assert_eq!("m i=-12,u=12,f=0.25,whole=3 1700000000000000000", line);
        assert!(!line.contains('"'));
    }

    #[test]
    fn test_bool_field() {
        let p = DataPoint::new("m").field("on", true).field("off", false);
        assert_eq!("m on=true,off=false 1", encode(&[p], 1).unwrap());
    }

    #[test]
    fn test_quotes_are_escaped() {
        let p = DataPoint::new("m").field("note", "say \"hi\"");
        assert_eq!("m note=\"say \\\"hi\\\"\" 1", encode(&[p], 1).unwrap());
    }

    #[test]
    fn test_non_numeric_lookalikes_are_quoted() {
        let p = DataPoint::new("m").field("a", "NaN").field("b", "inf").field("c", "25.5C");
        assert_eq!("m a=\"NaN\",b=\"inf\",c=\"25.5C\" 1", encode(&[p], 1).unwrap());
    }

    #[test]
    fn test_empty_tags_no_comma() {
        let p = DataPoint::new("sensor_data").field("value", 1);
        let line = encode(&[p], 5).unwrap();
        assert_eq!("sensor_data value=1 5", line);
        assert!(!line.split(' ').next().unwrap().contains(','));
    }

    #[test]
    fn test_null_and_empty_tags_dropped() {
        let p = DataPoint::new("sensor_data")
            .tag("a", PointValue::Null)
            .tag("b", "")
            .tag("c", Option::<&str>::None)
            .field("value", 1);
        assert_eq!("sensor_data value=1 5", encode(&[p], 5).unwrap());

        let p = DataPoint::new("sensor_data").tag("a", PointValue::Null).tag("b", "x").field("value", 1);
        assert_eq!("sensor_data,b=x value=1 5", encode(&[p], 5).unwrap());
    }

    #[test]
    fn test_non_string_tags() {
        let p = DataPoint::new("m").tag("floor", 3).tag("indoor", true).tag("gain", 1.5).field("v", 1);
        assert_eq!("m,floor=3,indoor=true,gain=1.5 v=1 9", encode(&[p], 9).unwrap());
    }

    #[test]
    fn test_tag_value_escaping() {
        assert_eq!("living\\ room", escape_tag_value("living room"));
        assert_eq!("a\\,b", escape_tag_value("a,b"));
        assert_eq!("a\\\tb", escape_tag_value("a\tb"));
        assert_eq!("plain", escape_tag_value("plain"));

        let p = DataPoint::new("m").tag("room", "living room, east").field("v", 1);
        assert_eq!("m,room=living\\ room\\,\\ east v=1 9", encode(&[p], 9).unwrap());
    }

    #[test]
    fn test_measurement_and_tag_key_not_escaped() {
        let p = DataPoint::new("my data").tag("tag key", "v").field("v", 1);
        assert_eq!("my data,tag key=v v=1 9", encode(&[p], 9).unwrap());
    }

    #[test]
    fn test_null_fields_dropped() {
        let p = DataPoint::new("m").field("a", PointValue::Null).field("b", 2);
        assert_eq!("m b=2 1", encode(&[p], 1).unwrap());
    }

    #[test]
    fn test_no_fields_rejected() {
        let p = DataPoint::new("sensor_data").tag("sensor_id", "s1").field("value", PointValue::Null);

        match encode(&[DataPoint::new("ok").field("v", 1), p], 1) {
            Err(InfluxError::InvalidPoint { index, measurement, .. }) => {
                assert_eq!(1, index);
                assert_eq!("sensor_data", measurement);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(matches!(encode(&[DataPoint::new("m")], 1), Err(InfluxError::InvalidPoint { index: 0, .. })));
    }

    #[test]
    fn test_empty_measurement_rejected() {
        let p = DataPoint::new("").field("v", 1);
        assert!(matches!(encode(&[p], 1), Err(InfluxError::InvalidPoint { .. })));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let p = DataPoint::new("m").field("v", f64::NAN);
        assert!(matches!(encode(&[p], 1), Err(InfluxError::InvalidPoint { .. })));
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert!(matches!(encode(&[], 1), Err(InfluxError::EmptyBatch)));
    }

    #[test]
    fn test_empty_raw_tag_dropped() {
        let p = DataPoint::new("m").tag("a", PointValue::Raw(String::new())).tag("b", "x").field("v", 1);
        assert_eq!("m,b=x v=1 1", encode(&[p], 1).unwrap());
    }

    #[test]
    fn test_raw_fallback() {
        let p = DataPoint::new("m").field("v", serde_json::json!([1, 2]));
        assert_eq!("m v=[1,2] 1", encode(&[p], 1).unwrap());
    }

    #[test]
    fn test_batch_shares_timestamp() {
        let points = vec![
            DataPoint::new("sensor_data").tag("key", "temperature").field("value", 25.5),
            DataPoint::new("sensor_data").tag("key", "humidity").field("value", 60),
        ];

        let text = encode(&points, TS).unwrap();
        assert_eq!(1, text.matches('\n').count());
        assert!(!text.ends_with('\n'));

        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(2, lines.len());
        for line in lines {
            assert!(line.ends_with(" 1700000000000000000"));
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let points = vec![DataPoint::new("m").tag("t", "a b").field("s", "x").field("n", 1)];
        let before = points.clone();

        assert_eq!(encode(&points, 3).unwrap(), encode(&points, 3).unwrap());
        assert_eq!(before, points);
    }

    #[test]
    fn test_to_line() {
        let p = DataPoint::new("m").field("v", 1);
        assert_eq!("m v=1 7", p.to_line(7).unwrap());
    }

    #[test]
    fn test_quote_field_string() {
        assert_eq!("\"\"", quote_field_string(""));
        assert_eq!("\"a\\\"b\"", quote_field_string("a\"b"));
    }
}
