//! HTTP Error Handling
//!
//! 错误响应使用真实的 HTTP 状态码，响应体为 `{"message": "...", "field": "..."}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 400，field 指向出错的请求字段
    Validation {
        field: Option<String>,
        message: String,
    },
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn validation(field: Option<String>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field,
            message: message.into(),
        }
    }

    /// AI 生成失败时对外只给出概括信息，细节写入日志
    pub fn generation_failed(err: ApplicationError, message: &'static str) -> Self {
        match err {
            ApplicationError::Generation(detail) => {
                tracing::error!(error = %detail, "{}", message);
                ApiError::Internal(message.to_string())
            }
            other => other.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation { field, message } => {
                tracing::warn!(field = ?field, error = %message, "Validation failed");
                ErrorBody { message, field }
            }
            ApiError::NotFound(message) => {
                tracing::warn!(error = %message, "Resource not found");
                ErrorBody {
                    message,
                    field: None,
                }
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                ErrorBody {
                    message,
                    field: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::Validation { field, message } => {
                ApiError::Validation { field, message }
            }
            ApplicationError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            ApplicationError::Generation(msg) => {
                ApiError::Internal(format!("Generation failed: {}", msg))
            }
            ApplicationError::RepositoryError(msg) => ApiError::Internal(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_carries_field() {
        let err: ApiError = ApplicationError::missing_field("genre").into();
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.field.as_deref(), Some("genre"));
        assert_eq!(body.message, "genre is required");
    }

    #[tokio::test]
    async fn test_not_found_status() {
        let err: ApiError = ApplicationError::not_found("Novel", 3).into();
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Novel not found: 3");
        assert!(body.field.is_none());
    }

    #[tokio::test]
    async fn test_generation_failure_hides_detail() {
        let err = ApiError::generation_failed(
            ApplicationError::Generation("HTTP 401: bad key".to_string()),
            "Failed to generate plot",
        );
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Failed to generate plot");
    }
}
