//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// 服务配置
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
            port: 3000,
        }
    }
}

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 日志输出格式：json（结构化）或 pretty（人类可读）
    pub log_format: String,
    pub metrics_enabled: bool,
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: true,
            metrics_port: 9090,
        }
    }
}

/// 规则评估配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// 默认是否在结果中附带诊断信息
    pub trace_enabled: bool,
    /// 记录数达到该阈值时并行评估
    pub parallel_threshold: usize,
    /// 并行线程数，1 表示始终串行
    pub worker_threads: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            trace_enabled: false,
            parallel_threshold: 1000,
            worker_threads: 1,
        }
    }
}

/// 规则存储配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RulesConfig {
    /// 启动时导入的规则文件（JSON 数组），不做校验
    pub seed_file: Option<String>,
}

/// 跨域配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// 允许的来源，为空或包含 "*" 时允许任意来源
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub server: ServerConfig,
    pub observability: ObservabilityConfig,
    pub evaluation: EvaluationConfig,
    pub rules: RulesConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（RULE_ 前缀，如 RULE_SERVER__PORT -> server.port）
    /// 5. PORT 环境变量
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("RULE_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let mut config = Self::load_from(Path::new(&config_dir), service_name, &env)?;

        if let Some(port) = Self::port_from_env() {
            config.server.port = port;
        }

        Ok(config)
    }

    /// 从指定目录加载配置
    pub fn load_from(config_dir: &Path, service_name: &str, env: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", env))).required(false))
            .add_source(
                File::from(config_dir.join(format!("{}.toml", service_name))).required(false),
            )
            // RULE_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("RULE")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    fn port_from_env() -> Option<u16> {
        std::env::var("PORT").ok().and_then(|v| v.parse().ok())
    }

    /// 获取服务地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_config_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("rule-config-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.evaluation.parallel_threshold, 1000);
        assert!(config.cors.allows_any());
        assert!(config.rules.seed_file.is_none());
    }

    #[test]
    fn test_server_addr() {
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            ..Default::default()
        };
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        let dir = temp_config_dir("empty");
        let config = AppConfig::load_from(&dir, "rule-service", "test").unwrap();

        assert_eq!(config.service_name, "rule-service");
        assert_eq!(config.environment, "test");
        assert_eq!(config.observability.log_format, "pretty");
        assert_eq!(config.evaluation.worker_threads, 1);
    }

    #[test]
    fn test_file_layering() {
        let dir = temp_config_dir("layered");
        fs::write(
            dir.join("default.toml"),
            r#"
            [server]
            port = 4000

            [evaluation]
            worker_threads = 2
            "#,
        )
        .unwrap();
        fs::write(
            dir.join("staging.toml"),
            r#"
            [server]
            port = 5000

            [cors]
            allowed_origins = ["https://example.com"]
            "#,
        )
        .unwrap();

        let config = AppConfig::load_from(&dir, "rule-service", "staging").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.evaluation.worker_threads, 2);
        assert!(!config.cors.allows_any());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_is_production() {
        let config = AppConfig {
            environment: "production".to_string(),
            ..Default::default()
        };
        assert!(config.is_production());
    }
}
