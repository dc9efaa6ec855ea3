use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{add_per_request_options, error::InfluxError, InfluxClient, InfluxOp, InfluxRequest, InfluxResult};

/// 查询结果中的一行。列名到值的映射
pub type QueryRow = Map<String, Value>;

/// 使用 SQL 查询数据，结果以 JSON 返回
#[derive(Debug, Default, Clone)]
pub struct QueryRequest {
    /// SQL 语句
    pub query: String,

    /// 目标数据库。没有设置的话使用客户端的默认数据库
    pub database: Option<String>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            database: None,
        }
    }

    /// 设置查询语句
    pub fn query(mut self, query: impl AsRef<str>) -> Self {
        self.query = query.as_ref().to_string();
        self
    }

    /// 设置数据库
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub(crate) fn validate(&self) -> InfluxResult<()> {
        if self.query.trim().is_empty() {
            return Err(InfluxError::ValidationFailed("query statement can not be empty".to_string()));
        }

        if let Some(db) = &self.database {
            if db.trim().is_empty() {
                return Err(InfluxError::ValidationFailed("database name can not be empty".to_string()));
            }
        }

        Ok(())
    }
}

/// 解析查询接口返回的 JSON：数组就是结果行，带 `error` 的对象是错误信息
pub(crate) fn parse_query_response<T>(value: Value) -> InfluxResult<Vec<T>>
where
    T: DeserializeOwned,
{
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),

        Value::Object(obj) if obj.contains_key("error") => {
            let message = match obj.get("error") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            Err(InfluxError::QueryError(message))
        }

        Value::Null => Ok(vec![]),

        other => Err(InfluxError::QueryError(format!("unexpected query response: {}", other))),
    }
}

#[derive(Debug, Default, Clone)]
pub struct QueryOperation {
    client: InfluxClient,
    request: QueryRequest,
}

add_per_request_options!(QueryOperation);

impl QueryOperation {
    pub(crate) fn new(client: InfluxClient, request: QueryRequest) -> Self {
        Self { client, request }
    }

    pub(crate) fn build_request(&self) -> InfluxResult<InfluxRequest> {
        self.request.validate()?;

        let database = match (&self.request.database, self.client.database()) {
            (Some(db), _) => db.trim().to_string(),
            (None, Some(db)) => db.to_string(),
            (None, None) => return Err(InfluxError::ValidationFailed("no database specified for query".to_string())),
        };

        let body = serde_json::to_vec(&serde_json::json!({ "query": self.request.query }))?;

        Ok(InfluxRequest {
            operation: InfluxOp::Query,
            content_type: Some("application/json"),
            query: vec![("db".to_string(), database)],
            body,
        })
    }

    /// 发送查询请求，每一行反序列化成 `T`。不关心结构的话可以用 [`QueryRow`]
    pub async fn send<T>(self) -> InfluxResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let req = self.build_request()?;

        let Self { client, request: _ } = self;

        let resp = client.send(req).await?;
        let bytes = resp.bytes().await?;

        if bytes.is_empty() {
            return Ok(vec![]);
        }

        parse_query_response(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod test_query {
    use serde::Deserialize;
    use serde_json::json;

    use crate::{error::InfluxError, test_util::setup, InfluxClient};

    use super::{parse_query_response, QueryRequest, QueryRow};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reading {
        sensor_id: String,
        key: String,
        value: f64,
    }

    #[test]
    fn test_build_request() {
        let client = InfluxClient::new("http://localhost:8181", "token", "sensors");
        let req = client.query(QueryRequest::new("SELECT * FROM sensor_data LIMIT 1")).build_request().unwrap();

        assert_eq!("http://localhost:8181/api/v3/query?db=sensors", client.build_url(&req).unwrap().as_str());

        let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
        assert_eq!(json!({"query": "SELECT * FROM sensor_data LIMIT 1"}), body);
    }

    #[test]
    fn test_empty_query() {
        let client = InfluxClient::new("http://localhost:8181", "token", "sensors");
        assert!(matches!(client.query(QueryRequest::new("  ")).build_request(), Err(InfluxError::ValidationFailed(_))));
    }

    #[test]
    fn test_database_override() {
        let client = InfluxClient::new("http://localhost:8181", "token", "sensors");

        let req = client.query(QueryRequest::new("SELECT 1").database(" other ")).build_request().unwrap();
        assert_eq!(("db".to_string(), "other".to_string()), req.query[0]);

        let res = client.query(QueryRequest::new("SELECT 1").database(" ")).build_request();
        assert!(matches!(res, Err(InfluxError::ValidationFailed(_))));
    }

    #[test]
    fn test_parse_rows() {
        let value = json!([
            {"sensor_id": "s1", "key": "temperature", "value": 25.5, "time": "2023-11-14T22:13:20"},
            {"sensor_id": "s1", "key": "humidity", "value": 60, "time": "2023-11-14T22:13:20"}
        ]);

        let rows: Vec<Reading> = parse_query_response(value.clone()).unwrap();
        assert_eq!(2, rows.len());
        assert_eq!(
            Reading {
                sensor_id: "s1".to_string(),
                key: "humidity".to_string(),
                value: 60.0
            },
            rows[1]
        );

        let rows: Vec<QueryRow> = parse_query_response(value).unwrap();
        assert_eq!(Some(&json!("temperature")), rows[0].get("key"));
    }

    #[test]
    fn test_parse_error_payload() {
        let res = parse_query_response::<QueryRow>(json!({"error": "table 'nope' not found"}));
        match res {
            Err(InfluxError::QueryError(msg)) => assert_eq!("table 'nope' not found", msg),
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(matches!(parse_query_response::<QueryRow>(json!("??")), Err(InfluxError::QueryError(_))));
        assert!(parse_query_response::<QueryRow>(json!(null)).unwrap().is_empty());
    }

    async fn test_query_impl() {
        setup();
        let client = InfluxClient::from_env().unwrap();

        let rows = client
            .query(QueryRequest::new("SELECT * FROM sensor_data ORDER BY time DESC LIMIT 10"))
            .send::<QueryRow>()
            .await;
        log::debug!("{:?}", rows);
        assert!(rows.is_ok());
    }

    #[tokio::test]
    #[ignore = "needs a running InfluxDB v3 server configured in .env"]
    async fn test_query() {
        test_query_impl().await;
    }
}
