use std::{fmt::Display, time::Duration};

use bytes::Bytes;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT as USER_AGENT_HEADER},
    Method, RequestBuilder, Response, StatusCode,
};
use url::Url;

use admin::InfluxDbConfig;
use data::{QueryOperation, QueryRequest, WriteLpOperation, WriteLpRequest};
use database::{ListDatabaseOperation, TestConnectionOperation};
use error::InfluxError;

pub mod admin;
pub mod data;
pub mod database;
pub mod eav;
pub mod error;
pub mod form;
pub mod line_protocol;
pub mod macros;
pub mod util;

#[cfg(test)]
pub mod test_util;

const USER_AGENT: &str = "eav-influxdb-rs/0.1.0";

const ENV_INFLUXDB_URL: &str = "INFLUXDB_URL";
const ENV_INFLUXDB_TOKEN: &str = "INFLUXDB_TOKEN";
const ENV_INFLUXDB_DATABASE: &str = "INFLUXDB_DATABASE";

pub type InfluxResult<T> = Result<T, InfluxError>;

/// 发送构造好的请求，两个客户端共用。
///
/// 只发送一次。非 2xx 的响应读出全部内容之后交给 `map_error` 转换成错误
pub(crate) async fn execute<F>(mut request_builder: RequestBuilder, options: &ClientOptions, operation: impl Display, map_error: F) -> InfluxResult<Response>
where
    F: FnOnce(StatusCode, String) -> InfluxError,
{
    if let Some(ms) = options.timeout_ms {
        request_builder = request_builder.timeout(Duration::from_millis(ms));
    }

    let response = request_builder.send().await?;

    log::debug!("<< {} status: {}", operation, response.status());

    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    log::error!("api call failed for operation {}: {} {}", operation, status, util::truncate_for_log(&text, 512));

    Err(map_error(status, text))
}

/// InfluxDB v3 的 HTTP 接口
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfluxOp {
    #[default]
    Undefined,

    WriteLp,
    Query,
    ListDatabase,
}

impl Display for InfluxOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InfluxOp::Undefined => "_Undefined_",
            InfluxOp::WriteLp => "WriteLp",
            InfluxOp::Query => "Query",
            InfluxOp::ListDatabase => "ListDatabase",
        };

        write!(f, "{}", s)
    }
}

impl InfluxOp {
    /// 接口路径
    pub fn path(&self) -> &'static str {
        match self {
            Self::Undefined => "/",
            Self::WriteLp => "/api/v3/write_lp",
            Self::Query => "/api/v3/query",
            Self::ListDatabase => "/api/v3/configure/database",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::ListDatabase => Method::GET,
            _ => Method::POST,
        }
    }
}

/// The request to send to InfluxDB
#[derive(Debug, Clone, Default)]
pub struct InfluxRequest {
    operation: InfluxOp,
    content_type: Option<&'static str>,

    /// 查询参数，按顺序拼接到 URL 上
    query: Vec<(String, String)>,
    body: Vec<u8>,
}

/// 客户端选项，也可以针对单次操作设置
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub timeout_ms: Option<u64>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// InfluxDB v3 client
#[derive(Clone, Default)]
pub struct InfluxClient {
    base_url: String,
    token: String,
    database: Option<String>,
    http_client: reqwest::Client,
    options: ClientOptions,
}

impl std::fmt::Debug for InfluxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfluxClient")
            .field("base_url", &self.base_url)
            .field("database", &self.database)
            .field("http_client", &self.http_client)
            .field("options", &self.options)
            .finish()
    }
}

impl From<&InfluxDbConfig> for InfluxClient {
    fn from(value: &InfluxDbConfig) -> Self {
        Self::new(&value.url, &value.token, &value.database)
    }
}

impl InfluxClient {
    /// 创建客户端。`database` 为空的时候，需要在每次操作上单独设置数据库
    pub fn new(base_url: &str, token: &str, database: &str) -> Self {
        Self {
            base_url: util::trim_endpoint(base_url),
            token: token.trim().to_string(),
            database: if database.trim().is_empty() { None } else { Some(database.trim().to_string()) },
            http_client: reqwest::Client::new(),
            options: ClientOptions::default(),
        }
    }

    /// Build an InfluxClient from env values. The following env vars are required:
    ///
    /// - `INFLUXDB_URL`: The InfluxDB v3 server. e.g. `http://localhost:8181`
    /// - `INFLUXDB_TOKEN`: The API token
    /// - `INFLUXDB_DATABASE`: The default database
    pub fn from_env() -> InfluxResult<Self> {
        let env = |name: &str| std::env::var(name).map_err(|_| InfluxError::ConfigError(format!("env var {} is missing", name)));

        let base_url = env(ENV_INFLUXDB_URL)?;
        let token = env(ENV_INFLUXDB_TOKEN)?;
        let database = env(ENV_INFLUXDB_DATABASE)?;

        Url::parse(&base_url)?;

        Ok(Self::new(&base_url, &token, &database))
    }

    /// 设置客户端级别的选项
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// 默认的数据库
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn build_url(&self, req: &InfluxRequest) -> InfluxResult<Url> {
        let mut url = Url::parse(format!("{}{}", self.base_url, req.operation.path()).as_str())?;

        if !req.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &req.query {
                pairs.append_pair(k, v);
            }
        }

        Ok(url)
    }

    fn prepare_headers(&self, req: &InfluxRequest) -> InfluxResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT));

        if !self.token.is_empty() {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", self.token))?);
        }

        if let Some(ct) = req.content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(ct));
        }

        Ok(headers)
    }

    /// 发送请求。只发送一次，不做重试。非 2xx 的响应会把响应内容原样放到错误里
    pub async fn send(&self, req: InfluxRequest) -> InfluxResult<Response> {
        let url = self.build_url(&req)?;
        let headers = self.prepare_headers(&req)?;

        let InfluxRequest { operation, body, .. } = req;

        log::debug!(">> {} {} {}, body length: {}", operation, operation.method(), url, body.len());

        let request_builder = self
            .http_client
            .request(operation.method(), url)
            .headers(headers)
            .body(Bytes::from(body));

        execute(request_builder, &self.options, operation, InfluxError::StatusError).await
    }

    /// 写入行协议数据
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> eav_influxdb_rs::InfluxResult<()> {
    /// use eav_influxdb_rs::{data::WriteLpRequest, line_protocol::DataPoint, InfluxClient};
    ///
    /// let client = InfluxClient::from_env()?;
    ///
    /// let request = WriteLpRequest::new()
    ///     .point(
    ///         DataPoint::new("sensor_data")
    ///             .tag("sensor_id", "s1")
    ///             .tag("key", "temperature")
    ///             .field("value", 25.5),
    ///     )
    ///     .point(DataPoint::new("sensor_data").field("status", "active"));
    ///
    /// let resp = client.write_lp(request).send().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn write_lp(&self, request: WriteLpRequest) -> WriteLpOperation {
        WriteLpOperation::new(self.clone(), request)
    }

    /// 使用 SQL 查询数据
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> eav_influxdb_rs::InfluxResult<()> {
    /// use eav_influxdb_rs::{data::{QueryRequest, QueryRow}, InfluxClient};
    ///
    /// let client = InfluxClient::from_env()?;
    /// let rows = client
    ///     .query(QueryRequest::new("SELECT * FROM sensor_data ORDER BY time DESC LIMIT 10"))
    ///     .send::<QueryRow>()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn query(&self, request: QueryRequest) -> QueryOperation {
        QueryOperation::new(self.clone(), request)
    }

    /// 列出服务器上的数据库
    pub fn list_database(&self) -> ListDatabaseOperation {
        ListDatabaseOperation::new(self.clone())
    }

    /// 测试连接：配置的数据库必须出现在数据库列表里
    pub fn test_connection(&self) -> TestConnectionOperation {
        TestConnectionOperation::new(self.clone())
    }
}
