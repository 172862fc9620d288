//! 服务器配置
//!
//! 配置来源按优先级: 默认值 < 配置文件(toml) < 环境变量(OPD__ 前缀)。

use config::{Config, Environment, File};
use opd_core::{OpdError, Result};
use opd_database::DatabaseConfig;
use serde::Deserialize;

/// HTTP监听配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// 生效的日志级别，命令行参数覆盖配置文件
    pub fn effective_level<'a>(&'a self, cli_override: Option<&'a str>) -> &'a str {
        cli_override.unwrap_or(&self.level)
    }
}

/// 应用配置
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 加载配置，config_path为None时只读默认值和环境变量
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }
        builder = builder.add_source(Environment::with_prefix("OPD").separator("__"));

        let cfg = builder
            .build()
            .map_err(|e| OpdError::Config(e.to_string()))?;
        cfg.try_deserialize()
            .map_err(|e| OpdError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_level_cli_overrides_config() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
        };
        assert_eq!(logging.effective_level(Some("trace")), "trace");
        assert_eq!(logging.effective_level(None), "debug");
    }

    #[test]
    fn test_defaults_without_config_file() {
        let cfg = AppConfig::load(None).unwrap();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.database.url.starts_with("postgres://"));
    }
}
