//! Novel Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NovelError {
    #[error("{message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("Invalid chapter order: {0}")]
    InvalidOrder(String),
}

impl NovelError {
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// 出错的请求字段名
    pub fn field(&self) -> &'static str {
        match self {
            NovelError::InvalidField { field, .. } => field,
            NovelError::InvalidOrder(_) => "orders",
        }
    }
}
