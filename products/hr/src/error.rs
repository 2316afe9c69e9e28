use platform_gateway::GatewayError;
use thiserror::Error;
use uuid::Uuid;

use crate::{validation::ValidationErrors, workflow::TransitionError};

pub type HrResult<T> = Result<T, HrError>;

#[derive(Debug, Error)]
pub enum HrError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("{collection} {id} not found")]
    NotFound { collection: &'static str, id: Uuid },
}

impl HrError {
    pub fn is_not_found(&self) -> bool {
        match self {
            HrError::NotFound { .. } => true,
            HrError::Gateway(err) => err.is_not_found(),
            _ => false,
        }
    }
}
