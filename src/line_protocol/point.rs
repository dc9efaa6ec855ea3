use super::PointValue;

/// 一个数据点（一行行协议数据）。
///
/// 标签和字段都按照添加的顺序保存，编码时也按照这个顺序输出。
/// 重复设置同一个键会在原来的位置替换掉旧值。
///
/// 数据点本身不带时间戳，一批数据点在编码时共享同一个纳秒时间戳。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPoint {
    /// 度量名称
    pub measurement: String,

    /// 标签
    pub tags: Vec<(String, PointValue)>,

    /// 字段
    pub fields: Vec<(String, PointValue)>,
}

fn upsert(items: &mut Vec<(String, PointValue)>, key: String, value: PointValue) {
    match items.iter_mut().find(|(k, _)| *k == key) {
        Some((_, v)) => *v = value,
        None => items.push((key, value)),
    }
}

impl DataPoint {
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            ..Default::default()
        }
    }

    /// 设置度量名称
    pub fn measurement(mut self, measurement: impl Into<String>) -> Self {
        self.measurement = measurement.into();
        self
    }

    /// 添加一个标签
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<PointValue>) -> Self {
        upsert(&mut self.tags, key.into(), value.into());
        self
    }

    /// 设置所有标签
    pub fn tags(mut self, tags: impl IntoIterator<Item = (impl Into<String>, impl Into<PointValue>)>) -> Self {
        self.tags.clear();
        for (k, v) in tags {
            upsert(&mut self.tags, k.into(), v.into());
        }
        self
    }

    /// 添加一个字段
    pub fn field(mut self, key: impl Into<String>, value: impl Into<PointValue>) -> Self {
        upsert(&mut self.fields, key.into(), value.into());
        self
    }

    /// 设置所有字段
    pub fn fields(mut self, fields: impl IntoIterator<Item = (impl Into<String>, impl Into<PointValue>)>) -> Self {
        self.fields.clear();
        for (k, v) in fields {
            upsert(&mut self.fields, k.into(), v.into());
        }
        self
    }

    pub fn get_tag(&self, key: &str) -> Option<&PointValue> {
        self.tags.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_field(&self, key: &str) -> Option<&PointValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}
