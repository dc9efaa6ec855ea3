use serde_json::Value;

use crate::{add_per_request_options, InfluxClient, InfluxOp, InfluxRequest, InfluxResult};

/// 数据库列表中可能出现的数据库名称字段，按顺序查找
const DATABASE_NAME_KEYS: &[&str] = &["iox::database", "database", "database_name", "name"];

/// 从数据库列表接口的一个元素中取出数据库名称
pub(crate) fn extract_database_name(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => DATABASE_NAME_KEYS
            .iter()
            .find_map(|k| obj.get(*k))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        _ => None,
    }
}

pub(crate) fn parse_database_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(extract_database_name).collect(),
        _ => vec![],
    }
}

/// 列出服务器上的所有数据库
#[derive(Default, Debug, Clone)]
pub struct ListDatabaseOperation {
    client: InfluxClient,
}

add_per_request_options!(ListDatabaseOperation);

impl ListDatabaseOperation {
    pub(crate) fn new(client: InfluxClient) -> Self {
        Self { client }
    }

    /// Consume the builder and send request
    pub async fn send(self) -> InfluxResult<Vec<String>> {
        let req = InfluxRequest {
            operation: InfluxOp::ListDatabase,
            query: vec![("format".to_string(), "json".to_string())],
            ..Default::default()
        };

        let Self { client } = self;

        let response = client.send(req).await?;
        let value: Value = serde_json::from_slice(&response.bytes().await?)?;

        Ok(parse_database_list(&value))
    }
}
