use std::fmt::{Display, Formatter};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置后台 API 返回的错误结构：`{ "error": "...", "details": "..." }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,

    #[serde(default)]
    pub details: Option<String>,
}

impl Display for ApiErrorBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(d) if !d.is_empty() => write!(f, "{}: {}", self.error, d),
            _ => write!(f, "{}", self.error),
        }
    }
}

#[derive(Error, Debug)]
pub enum InfluxError {
    #[error("{0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    UrlError(#[from] url::ParseError),

    #[error("{0}")]
    InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Can not encode an empty batch of points")]
    EmptyBatch,

    #[error("Invalid point at index {index} (measurement `{measurement}`): {reason}")]
    InvalidPoint { index: usize, measurement: String, reason: String },

    /// This is error for backend config API response.
    #[error("{0}")]
    ApiError(Box<ApiErrorBody>),

    #[error("Query failed: {0}")]
    QueryError(String),

    #[error("Database `{database}` does not exist. available databases: [{}]", .available.join(", "))]
    DatabaseNotFound { database: String, available: Vec<String> },

    #[error("Server response with non-successful code: {0}. response message is: {1}")]
    StatusError(StatusCode, String),
}
