//! EAV（实体-属性-值）传感器消息。
//!
//! 一条传感器消息，例如：
//!
//! ```json
//! {"sensor_id": "s1", "temperature": 25.5, "humidity": "60", "status": "active"}
//! ```
//!
//! 会被拆成每个属性一个数据点：
//!
//! ```text
//! sensor_data,sensor_id=s1,key=temperature value=25.5
//! sensor_data,sensor_id=s1,key=humidity value=60
//! sensor_data,sensor_id=s1,key=status value="active"
//! ```

use serde_json::{Map, Value};

use crate::{error::InfluxError, line_protocol::{DataPoint, PointValue}, InfluxResult};

/// 默认的度量名称
pub const DEFAULT_MEASUREMENT: &str = "sensor_data";

/// 默认的实体标识字段
pub const DEFAULT_ENTITY_KEY: &str = "sensor_id";

/// 属性名所在的标签
pub const ATTRIBUTE_TAG: &str = "key";

/// 属性值所在的字段
pub const VALUE_FIELD: &str = "value";

/// 消息中不作为属性处理的字段
const RESERVED_KEYS: &[&str] = &["timestamp"];

#[derive(Debug, Clone, PartialEq)]
pub struct EavMessage {
    /// 实体标识字段名，例如 `sensor_id`
    pub entity_key: String,

    /// 实体标识
    pub entity_id: PointValue,

    /// 属性，保持消息中的顺序
    pub attributes: Vec<(String, PointValue)>,
}

impl EavMessage {
    /// 从 JSON 对象构造。实体标识字段必须存在并且不能为 `null`
    pub fn from_object(obj: Map<String, Value>, entity_key: &str) -> InfluxResult<Self> {
        let mut entity_id = PointValue::Null;
        let mut attributes = vec![];

        for (k, v) in obj {
            if k == entity_key {
                entity_id = v.into();
                continue;
            }

            if RESERVED_KEYS.contains(&k.as_str()) {
                continue;
            }

            let v = PointValue::from(v);
            if !v.is_null() {
                attributes.push((k, v));
            }
        }

        match &entity_id {
            PointValue::Null => return Err(InfluxError::ValidationFailed(format!("missing entity field `{}` in message", entity_key))),
            PointValue::String(s) if s.is_empty() => return Err(InfluxError::ValidationFailed(format!("entity field `{}` is empty", entity_key))),
            _ => {}
        }

        Ok(Self {
            entity_key: entity_key.to_string(),
            entity_id,
            attributes,
        })
    }

    /// 解析 JSON 消息体
    pub fn from_json(payload: &[u8], entity_key: &str) -> InfluxResult<Self> {
        match serde_json::from_slice::<Value>(payload)? {
            Value::Object(obj) => Self::from_object(obj, entity_key),
            other => Err(InfluxError::ValidationFailed(format!("sensor message must be a JSON object, got: {}", other))),
        }
    }

    /// 每个属性生成一个数据点
    pub fn to_points(&self, measurement: &str) -> Vec<DataPoint> {
        self.attributes
            .iter()
            .map(|(k, v)| {
                DataPoint::new(measurement)
                    .tag(self.entity_key.as_str(), self.entity_id.clone())
                    .tag(ATTRIBUTE_TAG, k.as_str())
                    .field(VALUE_FIELD, v.clone())
            })
            .collect()
    }
}
