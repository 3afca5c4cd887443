//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{GenerationError, RepositoryError};
use crate::domain::novel::NovelError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 输入校验失败，field 指向出错的请求字段
    #[error("Validation error: {message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: i64,
    },

    /// AI 生成失败（不会写入任何数据）
    #[error("Generation failed: {0}")]
    Generation(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: i64) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建带字段的验证错误
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// 缺少必填字段
    pub fn missing_field(field: &'static str) -> Self {
        Self::invalid_field(field, format!("{} is required", field))
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Domain(e) => e.into(),
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<NovelError> for ApplicationError {
    fn from(err: NovelError) -> Self {
        Self::Validation {
            field: Some(err.field().to_string()),
            message: err.to_string(),
        }
    }
}

impl From<GenerationError> for ApplicationError {
    fn from(err: GenerationError) -> Self {
        Self::Generation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_keeps_field() {
        let err: ApplicationError = NovelError::invalid_field("genre", "genre cannot be empty").into();
        match err {
            ApplicationError::Validation { field, message } => {
                assert_eq!(field.as_deref(), Some("genre"));
                assert_eq!(message, "genre cannot be empty");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_repository_order_conflict_is_validation() {
        let err: ApplicationError =
            RepositoryError::from(NovelError::InvalidOrder("chapter 3 is missing".to_string()))
                .into();
        match err {
            ApplicationError::Validation { field, .. } => {
                assert_eq!(field.as_deref(), Some("orders"))
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err: ApplicationError = RepositoryError::DatabaseError("locked".to_string()).into();
        assert!(matches!(err, ApplicationError::RepositoryError(_)));
    }

    #[test]
    fn test_not_found_message() {
        let err = ApplicationError::not_found("Chapter", 42);
        assert_eq!(err.to_string(), "Chapter not found: 42");
    }
}
