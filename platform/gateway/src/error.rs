use thiserror::Error;
use uuid::Uuid;

use crate::settings::ConfigError;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failures talking to the hosted table service.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("gateway {endpoint} returned {status}: {body}")]
    Backend {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("failed to decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
    #[error("row {id} not found in {table}")]
    NotFound { table: String, id: Uuid },
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl GatewayError {
    pub fn decode(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Backend { status, .. } => *status == 404,
            _ => false,
        }
    }
}
