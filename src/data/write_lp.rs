use crate::{
    add_per_request_options,
    error::InfluxError,
    line_protocol::{encode, rules::PRECISION, DataPoint},
    util::current_time_ns,
    InfluxClient, InfluxOp, InfluxRequest, InfluxResult,
};

/// 以行协议格式批量写入数据点。
///
/// 一次请求中的所有数据点使用同一个纳秒时间戳：如果没有设置 `timestamp_ns`，发送时取一次当前时间。
#[derive(Debug, Default, Clone)]
pub struct WriteLpRequest {
    /// 目标数据库。没有设置的话使用客户端的默认数据库
    pub database: Option<String>,

    /// 要写入的数据点
    pub points: Vec<DataPoint>,

    /// 共享的纳秒时间戳
    pub timestamp_ns: Option<i64>,
}

impl WriteLpRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置数据库
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// 添加一个数据点
    pub fn point(mut self, point: DataPoint) -> Self {
        self.points.push(point);
        self
    }

    /// 设置所有的数据点
    pub fn points(mut self, points: impl IntoIterator<Item = DataPoint>) -> Self {
        self.points = points.into_iter().collect();
        self
    }

    /// 设置时间戳，纳秒为单位
    pub fn timestamp_ns(mut self, ts_ns: i64) -> Self {
        self.timestamp_ns = Some(ts_ns);
        self
    }

    pub(crate) fn validate(&self) -> InfluxResult<()> {
        if self.points.is_empty() {
            return Err(InfluxError::EmptyBatch);
        }

        if let Some(db) = &self.database {
            if db.trim().is_empty() {
                return Err(InfluxError::ValidationFailed("database name can not be empty".to_string()));
            }
        }

        Ok(())
    }
}

/// 写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteLpResponse {
    /// 写入的行数
    pub line_count: usize,

    /// 这一批数据使用的时间戳
    pub timestamp_ns: i64,
}

#[derive(Debug, Clone, Default)]
pub struct WriteLpOperation {
    client: InfluxClient,
    request: WriteLpRequest,
}

add_per_request_options!(WriteLpOperation);

impl WriteLpOperation {
    pub(crate) fn new(client: InfluxClient, request: WriteLpRequest) -> Self {
        Self { client, request }
    }

    /// 先编码，编码成功之后才会发送请求
    pub(crate) fn build_request(&self, timestamp_ns: i64) -> InfluxResult<InfluxRequest> {
        self.request.validate()?;

        let database = match (&self.request.database, self.client.database()) {
            (Some(db), _) => db.trim().to_string(),
            (None, Some(db)) => db.to_string(),
            (None, None) => return Err(InfluxError::ValidationFailed("no database specified for writing".to_string())),
        };

        let body = encode(&self.request.points, timestamp_ns)?;

        log::debug!("line protocol payload: {}", body);

        Ok(InfluxRequest {
            operation: InfluxOp::WriteLp,
            content_type: Some("text/plain; charset=utf-8"),
            query: vec![("db".to_string(), database), ("precision".to_string(), PRECISION.to_string())],
            body: body.into_bytes(),
        })
    }

    pub async fn send(self) -> InfluxResult<WriteLpResponse> {
        let timestamp_ns = self.request.timestamp_ns.unwrap_or_else(current_time_ns);
        let req = self.build_request(timestamp_ns)?;

        let Self { client, request } = self;

        client.send(req).await?;

        Ok(WriteLpResponse {
            line_count: request.points.len(),
            timestamp_ns,
        })
    }
}
