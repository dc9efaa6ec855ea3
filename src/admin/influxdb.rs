use url::Url;

use crate::{add_per_request_options, error::InfluxError, InfluxResult};

use super::{ActionResponse, AdminClient, AdminOp, AdminRequest, InfluxDbConfig, InfluxDbStatus};

pub(crate) fn validate_influxdb_config(config: &InfluxDbConfig) -> InfluxResult<()> {
    match Url::parse(config.url.trim()) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
        _ => return Err(InfluxError::ValidationFailed(format!("invalid InfluxDB url: `{}`", config.url))),
    }

    if config.database.trim().is_empty() {
        return Err(InfluxError::ValidationFailed("InfluxDB database can not be empty".to_string()));
    }

    Ok(())
}

#[derive(Debug, Default, Clone)]
pub struct GetInfluxDbConfigOperation {
    client: AdminClient,
}

add_per_request_options!(GetInfluxDbConfigOperation);

impl GetInfluxDbConfigOperation {
    pub(crate) fn new(client: AdminClient) -> Self {
        Self { client }
    }

    pub async fn send(self) -> InfluxResult<InfluxDbConfig> {
        let Self { client } = self;
        let resp = client.send(AdminRequest::new(AdminOp::GetInfluxDbConfig)).await?;
        Ok(serde_json::from_slice(&resp.bytes().await?)?)
    }
}

#[derive(Debug, Default, Clone)]
pub struct SaveInfluxDbConfigOperation {
    client: AdminClient,
    config: InfluxDbConfig,
}

add_per_request_options!(SaveInfluxDbConfigOperation);

impl SaveInfluxDbConfigOperation {
    pub(crate) fn new(client: AdminClient, config: InfluxDbConfig) -> Self {
        Self { client, config }
    }

    pub async fn send(self) -> InfluxResult<ActionResponse> {
        validate_influxdb_config(&self.config)?;

        let Self { client, config } = self;

        let resp = client.send(AdminRequest::json(AdminOp::SaveInfluxDbConfig, &config)?).await?;
        ActionResponse::from_bytes(&resp.bytes().await?)?.into_result()
    }
}

#[derive(Debug, Default, Clone)]
pub struct InfluxDbStatusOperation {
    client: AdminClient,
}

add_per_request_options!(InfluxDbStatusOperation);

impl InfluxDbStatusOperation {
    pub(crate) fn new(client: AdminClient) -> Self {
        Self { client }
    }

    pub async fn send(self) -> InfluxResult<InfluxDbStatus> {
        let Self { client } = self;
        let resp = client.send(AdminRequest::new(AdminOp::InfluxDbStatus)).await?;
        Ok(serde_json::from_slice(&resp.bytes().await?)?)
    }
}
