use std::sync::Arc;

use async_graphql::{Error, ErrorExtensions, Value};
use serde_json::json;
use thiserror::Error;

/// Shared GraphQL result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// One rejected input field, reported under `extensions.fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        fields: Vec<FieldIssue>,
    },
    #[error("resource not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Backend(String),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Backend(_) => "BACKEND",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Log the full chain; clients only see the masked message.
    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = ?err, "internal error");
        Self::Internal(Arc::new(err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        let mut err = Error::new(self.to_string());
        err = err.extend_with(|_err, e| {
            e.set("code", self.code());
        });
        if let ApiError::Validation { fields, .. } = self {
            if !fields.is_empty() {
                let listed = fields
                    .iter()
                    .map(|issue| json!({"field": issue.field, "message": issue.message}))
                    .collect::<Vec<_>>();
                let listed = Value::from_json(serde_json::Value::Array(listed)).unwrap_or(Value::Null);
                err = err.extend_with(|_err, e| {
                    e.set("fields", listed);
                });
            }
        }
        err
    }
}

/// Convert any error into a GraphQL error payload while hiding internals.
pub fn internal_error(err: impl Into<anyhow::Error>) -> Error {
    ApiError::internal(err.into()).extend()
}

/// A GraphQL error with only a message and `extensions.code`.
pub fn error_with_code(code: &'static str, message: impl Into<String>) -> Error {
    Error::new(message.into()).extend_with(|_err, e| e.set("code", code))
}
