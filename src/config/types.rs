//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// AI 文本生成配置
    #[serde(default)]
    pub ai: AiConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 示例数据配置
    #[serde(default)]
    pub seed: SeedConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,

    /// 前端构建产物的静态文件服务
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    #[serde(default)]
    pub enabled: bool,

    /// 静态文件目录，缺失的路径回退到其中的 index.html
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,

    /// URL 路径前缀（"/" 表示根路径托管）
    #[serde(default = "default_static_path")]
    pub path: String,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("dist/public")
}

fn default_static_path() -> String {
    "/".to_string()
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_static_dir(),
            path: default_static_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// AI 文本生成配置（OpenAI 兼容接口）
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,

    /// 未设置时服务照常启动，生成接口返回错误
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_ai_model")]
    pub model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,

    /// 生成内容使用的语言
    #[serde(default = "default_ai_language")]
    pub language: String,
}

fn default_ai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ai_model() -> String {
    "gpt-5.1".to_string()
}

fn default_ai_timeout() -> u64 {
    120
}

fn default_ai_language() -> String {
    "Arabic".to_string()
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_ai_base_url(),
            api_key: None,
            model: default_ai_model(),
            timeout_secs: default_ai_timeout(),
            language: default_ai_language(),
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/novelist.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// 示例数据配置
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// 库为空时写入一部示例小说
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,
}

fn default_seed_enabled() -> bool {
    true
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别，RUST_LOG 设置时以 RUST_LOG 为准
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.ai.base_url, "https://api.openai.com/v1");
        assert!(config.ai.api_key.is_none());
        assert_eq!(config.database.path, "data/novelist.db");
        assert!(config.seed.enabled);
        assert!(!config.server.static_files.enabled);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5000");
        assert_eq!(config.public_base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_public_base_url_override() {
        let config = ServerConfig {
            base_url: Some("https://novels.example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(config.public_base_url(), "https://novels.example.com");
    }
}
