use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiErrorBody, InfluxError},
    InfluxResult,
};

pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// PostgreSQL 连接配置。缺少的字段使用默认值
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,

    #[serde(alias = "username")]
    pub user: String,

    pub password: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_POSTGRES_PORT,
            database: String::new(),
            user: String::new(),
            password: String::new(),
        }
    }
}

impl std::fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .finish()
    }
}

/// InfluxDB 连接配置
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluxDbConfig {
    /// 服务地址，例如 `http://localhost:8181`
    #[serde(alias = "host")]
    pub url: String,

    pub token: String,
    pub database: String,
}

impl std::fmt::Debug for InfluxDbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfluxDbConfig").field("url", &self.url).field("database", &self.database).finish()
    }
}

/// InfluxDB 服务状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluxDbStatus {
    #[serde(default)]
    pub connected: bool,

    #[serde(default)]
    pub database: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

/// 后台操作类接口（测试连接、启动、重启等）的通用响应
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub details: Option<String>,
}

impl ActionResponse {
    /// 解析响应内容。空的响应内容当作成功，不是 JSON 的内容当作提示信息
    pub(crate) fn from_bytes(bytes: &[u8]) -> InfluxResult<Self> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Self::default());
        }

        match serde_json::from_slice::<Self>(bytes) {
            Ok(resp) => Ok(resp),
            Err(_) => Ok(Self {
                message: Some(String::from_utf8_lossy(bytes).trim().to_string()),
                ..Default::default()
            }),
        }
    }

    /// 2xx 响应里也可能带着失败信息
    pub fn into_result(self) -> InfluxResult<Self> {
        if self.success == Some(false) || self.error.is_some() {
            return Err(InfluxError::ApiError(Box::new(ApiErrorBody {
                error: self
                    .error
                    .clone()
                    .or_else(|| self.message.clone())
                    .unwrap_or_else(|| "operation failed".to_string()),
                details: self.details.clone(),
            })));
        }

        Ok(self)
    }
}
