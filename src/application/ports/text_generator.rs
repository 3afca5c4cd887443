//! Text Generator Port - 文本生成服务抽象
//!
//! 单次 prompt -> 文本 的调用，不重试、不流式、不缓存。
//! 具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// 文本生成错误
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Text generation is not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 期望的输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// 自由文本（HTML 正文等）
    Text,
    /// 单个 JSON 对象
    JsonObject,
}

/// 文本生成请求
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub format: ResponseFormat,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            format: ResponseFormat::Text,
        }
    }

    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            format: ResponseFormat::JsonObject,
        }
    }
}

/// Text Generator Port
///
/// 外部 LLM 服务的抽象接口
#[async_trait]
pub trait TextGeneratorPort: Send + Sync {
    /// 执行一次生成，返回模型输出的文本
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}
