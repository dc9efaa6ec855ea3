//! 连接配置页面。
//!
//! 页面状态只通过 [`reduce`] 改变：输入一个动作，得到新的状态和一个可选的副作用。
//! 副作用由 [`run_effect`] 执行，执行结果再作为动作交给 [`reduce`]。
//!
//! 保存配置和测试连接是两个独立的操作：测试连接不会保存，保存也不会先测试。

use crate::admin::{InfluxDbConfig, PostgresConfig};

mod effect;
mod state;

pub use effect::*;
pub use state::*;

#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    SwitchTab(Tab),
    SetPostgres(PostgresField, String),
    SetInfluxDb(InfluxDbField, String),

    /// 从后台加载已保存的配置
    Load,

    /// 加载完成。某一边加载失败时对应的配置是 `None`，失败信息放在 `error` 里
    Loaded {
        postgres: Option<PostgresConfig>,
        influxdb: Option<InfluxDbConfig>,
        error: Option<String>,
    },

    /// 保存当前标签页的配置
    Save,

    /// 测试当前标签页的连接
    TestConnection,

    /// 重启数据采集服务
    Restart,

    /// 副作用执行完成。`Ok` 和 `Err` 中都是给用户看的信息
    Completed(Result<String, String>),
}

/// 需要访问外部服务的操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadConfig,
    SavePostgres(PostgresConfig),
    TestPostgres(PostgresConfig),
    SaveInfluxDb(InfluxDbConfig),
    TestInfluxDb(InfluxDbConfig),
    Restart,
}

fn start(state: &mut ConfigScreen, text: &str, effect: Effect) -> Option<Effect> {
    state.busy = true;
    state.status = Some(StatusMessage::info(text));
    Some(effect)
}

/// 根据动作计算新的页面状态。不会修改传入的状态。
///
/// 有请求正在进行时，新的提交类动作会被忽略。
pub fn reduce(state: &ConfigScreen, action: FormAction) -> (ConfigScreen, Option<Effect>) {
    let mut next = state.clone();

    let is_submit = matches!(action, FormAction::Load | FormAction::Save | FormAction::TestConnection | FormAction::Restart);
    if is_submit && state.busy {
        log::debug!("ignore {:?} while another request is in flight", action);
        return (next, None);
    }

    let effect = match action {
        FormAction::SwitchTab(tab) => {
            next.active_tab = tab;
            if !next.busy {
                next.status = None;
            }
            None
        }

        FormAction::SetPostgres(field, value) => {
            next.postgres.set(field, value);
            None
        }

        FormAction::SetInfluxDb(field, value) => {
            next.influxdb.set(field, value);
            None
        }

        FormAction::Load => start(&mut next, "Loading configuration...", Effect::LoadConfig),

        FormAction::Loaded { postgres, influxdb, error } => {
            if let Some(cfg) = &postgres {
                next.postgres = PostgresForm::from(cfg);
            }
            if let Some(cfg) = &influxdb {
                next.influxdb = InfluxDbForm::from(cfg);
            }
            next.busy = false;
            next.status = error.map(StatusMessage::error);
            None
        }

        FormAction::Save => match next.active_tab {
            Tab::Postgres => match next.postgres.validate() {
                Ok(cfg) => start(&mut next, "Saving PostgreSQL configuration...", Effect::SavePostgres(cfg)),
                Err(msg) => {
                    next.status = Some(StatusMessage::error(msg));
                    None
                }
            },
            Tab::InfluxDb => match next.influxdb.validate() {
                Ok(cfg) => start(&mut next, "Saving InfluxDB configuration...", Effect::SaveInfluxDb(cfg)),
                Err(msg) => {
                    next.status = Some(StatusMessage::error(msg));
                    None
                }
            },
        },

        FormAction::TestConnection => match next.active_tab {
            Tab::Postgres => match next.postgres.validate() {
                Ok(cfg) => start(&mut next, "Testing PostgreSQL connection...", Effect::TestPostgres(cfg)),
                Err(msg) => {
                    next.status = Some(StatusMessage::error(msg));
                    None
                }
            },
            Tab::InfluxDb => match next.influxdb.validate() {
                Ok(cfg) => start(&mut next, "Testing InfluxDB connection...", Effect::TestInfluxDb(cfg)),
                Err(msg) => {
                    next.status = Some(StatusMessage::error(msg));
                    None
                }
            },
        },

        FormAction::Restart => start(&mut next, "Restarting service...", Effect::Restart),

        FormAction::Completed(result) => {
            next.busy = false;
            next.status = Some(match result {
                Ok(text) => StatusMessage::success(text),
                Err(text) => StatusMessage::error(text),
            });
            None
        }
    };

    (next, effect)
}
