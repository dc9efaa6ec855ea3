use std::time::Duration;

use crate::{add_per_request_options, InfluxResult};

use super::{ActionResponse, AdminClient, AdminOp, AdminRequest, InfluxDbStatus};

/// 启动数据采集服务
#[derive(Debug, Default, Clone)]
pub struct StartOperation {
    client: AdminClient,
}

add_per_request_options!(StartOperation);

impl StartOperation {
    pub(crate) fn new(client: AdminClient) -> Self {
        Self { client }
    }

    pub async fn send(self) -> InfluxResult<ActionResponse> {
        let Self { client } = self;
        let resp = client.send(AdminRequest::new(AdminOp::Start)).await?;
        ActionResponse::from_bytes(&resp.bytes().await?)?.into_result()
    }
}

/// 重启数据采集服务
#[derive(Debug, Default, Clone)]
pub struct AutoRestartOperation {
    client: AdminClient,
}

add_per_request_options!(AutoRestartOperation);

impl AutoRestartOperation {
    pub(crate) fn new(client: AdminClient) -> Self {
        Self { client }
    }

    pub async fn send(self) -> InfluxResult<ActionResponse> {
        let Self { client } = self;
        let resp = client.send(AdminRequest::new(AdminOp::AutoRestart)).await?;
        ActionResponse::from_bytes(&resp.bytes().await?)?.into_result()
    }

    /// 发送重启请求，等待 `delay` 之后查询一次 InfluxDB 状态。只查询一次，不会反复轮询
    pub async fn send_and_check(self, delay: Duration) -> InfluxResult<InfluxDbStatus> {
        let client = self.client.clone();

        let resp = self.send().await?;
        log::info!("restart requested: {:?}", resp.message);

        tokio::time::sleep(delay).await;

        client.influxdb_status().send().await
    }
}
