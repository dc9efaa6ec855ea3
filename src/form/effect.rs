use std::time::Duration;

use crate::{admin::AdminClient, InfluxClient, InfluxResult};

use super::{Effect, FormAction};

/// 重启之后等待多久再检查一次状态
pub const RESTART_CHECK_DELAY: Duration = Duration::from_secs(3);

fn completed<T>(result: InfluxResult<T>, on_success: impl FnOnce(T) -> String) -> FormAction {
    match result {
        Ok(v) => FormAction::Completed(Ok(on_success(v))),
        Err(e) => {
            log::error!("effect failed: {}", e);
            FormAction::Completed(Err(e.to_string()))
        }
    }
}

/// 执行副作用，把结果转换成下一个动作。错误会被转换成给用户看的文本，不会返回 `Err`
pub async fn run_effect(admin: &AdminClient, effect: Effect) -> FormAction {
    log::debug!("run effect: {:?}", effect);

    match effect {
        Effect::LoadConfig => {
            let postgres = admin.get_postgres_config().send().await;
            let influxdb = admin.get_influxdb_config().send().await;

            let mut errors = vec![];
            if let Err(e) = &postgres {
                log::error!("load postgres config failed: {}", e);
                errors.push(format!("Failed to load PostgreSQL configuration: {}", e));
            }
            if let Err(e) = &influxdb {
                log::error!("load influxdb config failed: {}", e);
                errors.push(format!("Failed to load InfluxDB configuration: {}", e));
            }

            FormAction::Loaded {
                postgres: postgres.ok(),
                influxdb: influxdb.ok(),
                error: if errors.is_empty() { None } else { Some(errors.join("; ")) },
            }
        }

        Effect::SavePostgres(cfg) => completed(admin.save_postgres_config(cfg).send().await, |r| {
            r.message.unwrap_or_else(|| "PostgreSQL configuration saved".to_string())
        }),

        Effect::TestPostgres(cfg) => completed(admin.test_postgres_connection(cfg).send().await, |r| {
            r.message.unwrap_or_else(|| "PostgreSQL connection successful".to_string())
        }),

        Effect::SaveInfluxDb(cfg) => completed(admin.save_influxdb_config(cfg).send().await, |r| {
            r.message.unwrap_or_else(|| "InfluxDB configuration saved".to_string())
        }),

        // 直接连接 InfluxDB 检查数据库是否存在，不经过后台
        Effect::TestInfluxDb(cfg) => {
            let client = InfluxClient::from(&cfg);
            completed(client.test_connection().send().await, |db| {
                format!("Connected to InfluxDB. database `{}` exists", db)
            })
        }

        Effect::Restart => match admin.auto_restart().send_and_check(RESTART_CHECK_DELAY).await {
            Ok(status) if status.connected => FormAction::Completed(Ok("Service restarted".to_string())),
            Ok(status) => FormAction::Completed(Err(format!(
                "Service restarted but InfluxDB is not connected{}",
                status.message.map(|m| format!(": {}", m)).unwrap_or_default()
            ))),
            Err(e) => FormAction::Completed(Err(e.to_string())),
        },
    }
}
