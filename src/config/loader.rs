//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `NOVELIST_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `NOVELIST_SERVER__PORT=8080`
/// - `NOVELIST_AI__API_KEY=sk-...`
/// - `NOVELIST_AI__BASE_URL=http://localhost:11434/v1`
/// - `NOVELIST_DATABASE__PATH=/data/novelist.db`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default("ai.base_url", "https://api.openai.com/v1")?
        .set_default("ai.model", "gpt-5.1")?
        .set_default("ai.timeout_secs", 120)?
        .set_default("ai.language", "Arabic")?
        .set_default("database.path", "data/novelist.db")?
        .set_default("database.max_connections", 5)?
        .set_default("seed.enabled", true)?
        .set_default("log.level", "info")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: NOVELIST_AI__MODEL=gpt-4o-mini
    builder = builder.add_source(
        Environment::with_prefix("NOVELIST")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.ai.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "AI base URL cannot be empty".to_string(),
        ));
    }

    if config.ai.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "AI timeout cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 只保留前 3 个字符
fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(3).collect();
    format!("{}***", visible)
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    if config.server.static_files.enabled {
        tracing::info!(
            "Static Files: {:?} at {}",
            config.server.static_files.dir,
            config.server.static_files.path
        );
    }
    tracing::info!("AI Base URL: {}", config.ai.base_url);
    tracing::info!("AI Model: {}", config.ai.model);
    tracing::info!(
        "AI API Key: {}",
        config
            .ai
            .api_key
            .as_deref()
            .map(mask_secret)
            .unwrap_or_else(|| "(not set)".to_string())
    );
    tracing::info!("AI Timeout: {}s", config.ai.timeout_secs);
    tracing::info!("AI Language: {}", config.ai.language);
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!("Seed Data: {}", config.seed.enabled);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_db_path() {
        let mut config = AppConfig::default();
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_ai_timeout() {
        let mut config = AppConfig::default();
        config.ai.timeout_secs = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("sk-abcdef"), "sk-***");
        assert_eq!(mask_secret("ab"), "ab***");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8088

[ai]
model = "local-model"
language = "English"

[seed]
enabled = false
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.ai.model, "local-model");
        assert_eq!(config.ai.language, "English");
        assert!(!config.seed.enabled);
        // 未出现在文件中的字段使用默认值
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_from_path(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_invalid_file_value_fails_validation() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[ai]\ntimeout_secs = 0").unwrap();

        let result = load_config_from_path(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
