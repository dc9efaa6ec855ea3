use crate::{add_per_request_options, error::InfluxError, InfluxClient, InfluxResult};

/// 连接测试：能列出数据库，并且目标数据库在列表里才算成功。
///
/// 只做检查，不会保存任何配置。
#[derive(Default, Debug, Clone)]
pub struct TestConnectionOperation {
    client: InfluxClient,
    database: Option<String>,
}

add_per_request_options!(TestConnectionOperation);

/// 检查数据库是否存在
pub(crate) fn check_database_exists(database: &str, available: Vec<String>) -> InfluxResult<()> {
    if available.iter().any(|d| d == database) {
        return Ok(());
    }

    Err(InfluxError::DatabaseNotFound {
        database: database.to_string(),
        available,
    })
}

impl TestConnectionOperation {
    pub(crate) fn new(client: InfluxClient) -> Self {
        Self { client, database: None }
    }

    /// 检查指定的数据库，而不是客户端的默认数据库
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// 成功时返回检查过的数据库名称
    pub async fn send(self) -> InfluxResult<String> {
        let Self { client, database } = self;

        let database = match database.or_else(|| client.database().map(|s| s.to_string())) {
            Some(db) if !db.trim().is_empty() => db.trim().to_string(),
            _ => return Err(InfluxError::ValidationFailed("database name is required for connection test".to_string())),
        };

        let available = client.list_database().send().await?;
        log::debug!("available databases: {:?}", available);

        check_database_exists(&database, available)?;

        Ok(database)
    }
}
