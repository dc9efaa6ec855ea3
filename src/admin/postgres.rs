use crate::{add_per_request_options, error::InfluxError, InfluxResult};

use super::{ActionResponse, AdminClient, AdminOp, AdminRequest, PostgresConfig};

pub(crate) fn validate_postgres_config(config: &PostgresConfig) -> InfluxResult<()> {
    if config.host.trim().is_empty() {
        return Err(InfluxError::ValidationFailed("postgres host can not be empty".to_string()));
    }

    if config.port == 0 {
        return Err(InfluxError::ValidationFailed("postgres port can not be 0".to_string()));
    }

    if config.database.trim().is_empty() {
        return Err(InfluxError::ValidationFailed("postgres database can not be empty".to_string()));
    }

    if config.user.trim().is_empty() {
        return Err(InfluxError::ValidationFailed("postgres user can not be empty".to_string()));
    }

    Ok(())
}

#[derive(Debug, Default, Clone)]
pub struct GetPostgresConfigOperation {
    client: AdminClient,
}

add_per_request_options!(GetPostgresConfigOperation);

impl GetPostgresConfigOperation {
    pub(crate) fn new(client: AdminClient) -> Self {
        Self { client }
    }

    pub async fn send(self) -> InfluxResult<PostgresConfig> {
        let Self { client } = self;
        let resp = client.send(AdminRequest::new(AdminOp::GetPostgresConfig)).await?;
        Ok(serde_json::from_slice(&resp.bytes().await?)?)
    }
}

#[derive(Debug, Default, Clone)]
pub struct SavePostgresConfigOperation {
    client: AdminClient,
    config: PostgresConfig,
}

add_per_request_options!(SavePostgresConfigOperation);

impl SavePostgresConfigOperation {
    pub(crate) fn new(client: AdminClient, config: PostgresConfig) -> Self {
        Self { client, config }
    }

    pub async fn send(self) -> InfluxResult<ActionResponse> {
        validate_postgres_config(&self.config)?;

        let Self { client, config } = self;

        let resp = client.send(AdminRequest::json(AdminOp::SavePostgresConfig, &config)?).await?;
        ActionResponse::from_bytes(&resp.bytes().await?)?.into_result()
    }
}

#[derive(Debug, Default, Clone)]
pub struct TestPostgresConnectionOperation {
    client: AdminClient,
    config: PostgresConfig,
}

add_per_request_options!(TestPostgresConnectionOperation);

impl TestPostgresConnectionOperation {
    pub(crate) fn new(client: AdminClient, config: PostgresConfig) -> Self {
        Self { client, config }
    }

    pub async fn send(self) -> InfluxResult<ActionResponse> {
        validate_postgres_config(&self.config)?;

        let Self { client, config } = self;

        let resp = client.send(AdminRequest::json(AdminOp::TestPostgresConnection, &config)?).await?;
        ActionResponse::from_bytes(&resp.bytes().await?)?.into_result()
    }
}
