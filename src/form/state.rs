use url::Url;

use crate::admin::{InfluxDbConfig, PostgresConfig};

/// 配置页面的标签页
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Postgres,
    InfluxDb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostgresField {
    Host,
    Port,
    Database,
    User,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfluxDbField {
    Url,
    Token,
    Database,
}

/// PostgreSQL 表单。所有字段都是用户输入的原始文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresForm {
    pub host: String,
    pub port: String,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl Default for PostgresForm {
    fn default() -> Self {
        Self::from(&PostgresConfig::default())
    }
}

impl From<&PostgresConfig> for PostgresForm {
    fn from(value: &PostgresConfig) -> Self {
        Self {
            host: value.host.clone(),
            port: value.port.to_string(),
            database: value.database.clone(),
            user: value.user.clone(),
            password: value.password.clone(),
        }
    }
}

fn required(value: &str, label: &str) -> Result<String, String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(format!("{} is required", label));
    }
    Ok(v.to_string())
}

impl PostgresForm {
    pub fn set(&mut self, field: PostgresField, value: String) {
        match field {
            PostgresField::Host => self.host = value,
            PostgresField::Port => self.port = value,
            PostgresField::Database => self.database = value,
            PostgresField::User => self.user = value,
            PostgresField::Password => self.password = value,
        }
    }

    /// 校验表单，生成配置。失败时返回给用户看的提示
    pub fn validate(&self) -> Result<PostgresConfig, String> {
        let host = required(&self.host, "Host")?;

        let port = match self.port.trim().parse::<u16>() {
            Ok(p) if p > 0 => p,
            _ => return Err("Port must be a number between 1 and 65535".to_string()),
        };

        let database = required(&self.database, "Database")?;
        let user = required(&self.user, "User")?;

        Ok(PostgresConfig {
            host,
            port,
            database,
            user,
            // 密码可以为空，也不做 trim
            password: self.password.clone(),
        })
    }
}

/// InfluxDB 表单
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfluxDbForm {
    pub url: String,
    pub token: String,
    pub database: String,
}

impl From<&InfluxDbConfig> for InfluxDbForm {
    fn from(value: &InfluxDbConfig) -> Self {
        Self {
            url: value.url.clone(),
            token: value.token.clone(),
            database: value.database.clone(),
        }
    }
}

impl InfluxDbForm {
    pub fn set(&mut self, field: InfluxDbField, value: String) {
        match field {
            InfluxDbField::Url => self.url = value,
            InfluxDbField::Token => self.token = value,
            InfluxDbField::Database => self.database = value,
        }
    }

    pub fn validate(&self) -> Result<InfluxDbConfig, String> {
        let url = required(&self.url, "URL")?;

        match Url::parse(&url) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
            _ => return Err(format!("URL must start with http:// or https://, got `{}`", url)),
        }

        let database = required(&self.database, "Database")?;

        Ok(InfluxDbConfig {
            url,
            token: self.token.trim().to_string(),
            database,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// 显示给用户的状态信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// 配置页面的全部状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigScreen {
    pub active_tab: Tab,
    pub postgres: PostgresForm,
    pub influxdb: InfluxDbForm,

    /// 有请求正在进行中
    pub busy: bool,

    pub status: Option<StatusMessage>,
}

impl ConfigScreen {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod test_form_state {
    use super::{InfluxDbField, InfluxDbForm, PostgresField, PostgresForm};

    #[test]
    fn test_postgres_defaults() {
        let form = PostgresForm::default();
        assert_eq!("localhost", form.host);
        assert_eq!("5432", form.port);
    }

    #[test]
    fn test_postgres_validate() {
        let mut form = PostgresForm::default();
        assert_eq!(Err("Database is required".to_string()), form.validate());

        form.set(PostgresField::Database, " sensors ".to_string());
        form.set(PostgresField::User, "postgres".to_string());
        form.set(PostgresField::Password, " pw ".to_string());

        let cfg = form.validate().unwrap();
        assert_eq!("sensors", cfg.database);
        assert_eq!(" pw ", cfg.password);
        assert_eq!(5432, cfg.port);

        for bad in ["", "abc", "0", "70000", "-1"] {
            form.set(PostgresField::Port, bad.to_string());
            assert_eq!(Err("Port must be a number between 1 and 65535".to_string()), form.validate());
        }

        form.set(PostgresField::Port, "6543".to_string());
        assert_eq!(6543, form.validate().unwrap().port);
    }

    #[test]
    fn test_influxdb_validate() {
        let mut form = InfluxDbForm::default();
        assert_eq!(Err("URL is required".to_string()), form.validate());

        form.set(InfluxDbField::Url, "localhost:8181".to_string());
        assert!(form.validate().unwrap_err().starts_with("URL must start with"));

        form.set(InfluxDbField::Url, "http://localhost:8181".to_string());
        assert_eq!(Err("Database is required".to_string()), form.validate());

        form.set(InfluxDbField::Database, "sensors".to_string());
        form.set(InfluxDbField::Token, " abc ".to_string());
        let cfg = form.validate().unwrap();
        assert_eq!("abc", cfg.token);
        assert_eq!("http://localhost:8181", cfg.url);
    }
}
