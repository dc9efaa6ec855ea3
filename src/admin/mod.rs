//! 配置后台 API 客户端。
//!
//! 后台负责保存 PostgreSQL 和 InfluxDB 的连接配置，以及启动、重启数据采集服务。
//! 失败的响应使用 `{ "error": "...", "details": "..." }` 的结构。

use std::fmt::Display;

use bytes::Bytes;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT as USER_AGENT_HEADER},
    Method, Response,
};
use url::Url;

use crate::{
    error::{ApiErrorBody, InfluxError},
    util, ClientOptions, InfluxResult, USER_AGENT,
};

mod influxdb;
mod model;
mod postgres;
mod service;

pub use influxdb::*;
pub use model::*;
pub use postgres::*;
pub use service::*;

const ENV_ADMIN_API_ENDPOINT: &str = "ADMIN_API_ENDPOINT";

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOp {
    #[default]
    Undefined,

    GetPostgresConfig,
    SavePostgresConfig,
    TestPostgresConnection,

    GetInfluxDbConfig,
    SaveInfluxDbConfig,
    InfluxDbStatus,

    Start,
    AutoRestart,
}

impl Display for AdminOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AdminOp::Undefined => "_Undefined_",
            AdminOp::GetPostgresConfig => "GetPostgresConfig",
            AdminOp::SavePostgresConfig => "SavePostgresConfig",
            AdminOp::TestPostgresConnection => "TestPostgresConnection",
            AdminOp::GetInfluxDbConfig => "GetInfluxDbConfig",
            AdminOp::SaveInfluxDbConfig => "SaveInfluxDbConfig",
            AdminOp::InfluxDbStatus => "InfluxDbStatus",
            AdminOp::Start => "Start",
            AdminOp::AutoRestart => "AutoRestart",
        };

        write!(f, "{}", s)
    }
}

impl AdminOp {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Undefined => "/",
            Self::GetPostgresConfig | Self::SavePostgresConfig => "/api/postgres/config",
            Self::TestPostgresConnection => "/api/postgres/test",
            Self::GetInfluxDbConfig | Self::SaveInfluxDbConfig => "/api/influxdb/config",
            Self::InfluxDbStatus => "/api/influxdb/status",
            Self::Start => "/api/start",
            Self::AutoRestart => "/api/auto-restart",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::GetPostgresConfig | Self::GetInfluxDbConfig | Self::InfluxDbStatus => Method::GET,
            _ => Method::POST,
        }
    }
}

/// The request to send to the config backend
#[derive(Debug, Clone, Default)]
pub struct AdminRequest {
    operation: AdminOp,

    /// JSON 请求体。为空的时候不设置 `Content-Type`
    body: Vec<u8>,
}

impl AdminRequest {
    pub(crate) fn new(operation: AdminOp) -> Self {
        Self { operation, body: vec![] }
    }

    pub(crate) fn json<T: serde::Serialize>(operation: AdminOp, body: &T) -> InfluxResult<Self> {
        Ok(Self {
            operation,
            body: serde_json::to_vec(body)?,
        })
    }
}

/// 把失败响应的内容转换成错误
pub(crate) fn parse_error_response(status: reqwest::StatusCode, text: &str) -> InfluxError {
    match serde_json::from_str::<ApiErrorBody>(text) {
        Ok(body) => InfluxError::ApiError(Box::new(body)),
        Err(_) => InfluxError::StatusError(status, text.to_string()),
    }
}

/// Config backend client
#[derive(Debug, Clone, Default)]
pub struct AdminClient {
    endpoint: String,
    http_client: reqwest::Client,
    options: ClientOptions,
}

impl AdminClient {
    /// 例如 `http://localhost:3001`
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: util::trim_endpoint(endpoint),
            http_client: reqwest::Client::new(),
            options: ClientOptions::default(),
        }
    }

    /// Build an AdminClient from env value `ADMIN_API_ENDPOINT`
    pub fn from_env() -> InfluxResult<Self> {
        let endpoint = std::env::var(ENV_ADMIN_API_ENDPOINT).map_err(|_| InfluxError::ConfigError(format!("env var {} is missing", ENV_ADMIN_API_ENDPOINT)))?;
        Url::parse(&endpoint)?;

        Ok(Self::new(&endpoint))
    }

    /// 设置客户端级别的选项
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(crate) fn build_url(&self, req: &AdminRequest) -> InfluxResult<Url> {
        Ok(Url::parse(format!("{}{}", self.endpoint, req.operation.path()).as_str())?)
    }

    pub async fn send(&self, req: AdminRequest) -> InfluxResult<Response> {
        let url = self.build_url(&req)?;

        let AdminRequest { operation, body } = req;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT));
        if !body.is_empty() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        log::debug!(">> {} {} {}", operation, operation.method(), url);

        let request_builder = self.http_client.request(operation.method(), url).headers(headers).body(Bytes::from(body));

        crate::execute(request_builder, &self.options, operation, |status, text| parse_error_response(status, &text)).await
    }

    /// 获取 PostgreSQL 配置
    pub fn get_postgres_config(&self) -> GetPostgresConfigOperation {
        GetPostgresConfigOperation::new(self.clone())
    }

    /// 保存 PostgreSQL 配置
    pub fn save_postgres_config(&self, config: PostgresConfig) -> SavePostgresConfigOperation {
        SavePostgresConfigOperation::new(self.clone(), config)
    }

    /// 由后台测试 PostgreSQL 连接。不会保存配置
    pub fn test_postgres_connection(&self, config: PostgresConfig) -> TestPostgresConnectionOperation {
        TestPostgresConnectionOperation::new(self.clone(), config)
    }

    /// 获取 InfluxDB 配置
    pub fn get_influxdb_config(&self) -> GetInfluxDbConfigOperation {
        GetInfluxDbConfigOperation::new(self.clone())
    }

    /// 保存 InfluxDB 配置
    pub fn save_influxdb_config(&self, config: InfluxDbConfig) -> SaveInfluxDbConfigOperation {
        SaveInfluxDbConfigOperation::new(self.clone(), config)
    }

    /// 查询 InfluxDB 服务状态
    pub fn influxdb_status(&self) -> InfluxDbStatusOperation {
        InfluxDbStatusOperation::new(self.clone())
    }

    /// 启动数据采集服务
    pub fn start(&self) -> StartOperation {
        StartOperation::new(self.clone())
    }

    /// 重启数据采集服务
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> eav_influxdb_rs::InfluxResult<()> {
    /// use std::time::Duration;
    ///
    /// use eav_influxdb_rs::admin::AdminClient;
    ///
    /// let admin = AdminClient::new("http://localhost:3001");
    /// let status = admin.auto_restart().send_and_check(Duration::from_secs(3)).await?;
    /// println!("connected after restart: {}", status.connected);
    /// # Ok(())
    /// # }
    /// ```
    pub fn auto_restart(&self) -> AutoRestartOperation {
        AutoRestartOperation::new(self.clone())
    }
}
