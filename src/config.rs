use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// 历史交易表格的最大行数
    pub history_limit: i64,
    /// 单据链接前缀, 例如 https://erp.example.com
    pub site_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/erpnext".to_string(),
                max_connections: 20,
            },
            dashboard: DashboardConfig {
                history_limit: 5,
                site_url: String::new(),
            },
        }
    }
}

impl AppConfig {
    /// 加载顺序: 默认值 → config/buying-dashboard.* (可选) → 环境变量 BUYING__*
    ///
    /// `DATABASE_URL` 优先于 database.url。
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", i64::from(defaults.database.max_connections))?
            .set_default("dashboard.history_limit", defaults.dashboard.history_limit)?
            .set_default("dashboard.site_url", defaults.dashboard.site_url)?
            .add_source(File::with_name("config/buying-dashboard").required(false))
            .add_source(
                Environment::with_prefix("BUYING")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        if config.dashboard.history_limit <= 0 {
            return Err(ConfigError::Message(format!(
                "dashboard.history_limit must be positive, got {}",
                config.dashboard.history_limit
            )));
        }
        Ok(config)
    }
}
