//! Whole-request pipeline failures
//!
//! These stop a run before any step executes. Step-level failures are
//! reported as error results instead.

use thiserror::Error;

use crate::domain::DomainError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Storage(String),
}

impl PipelineError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Unauthorized".to_string())
    }

    pub fn forbidden() -> Self {
        Self::Forbidden("Forbidden".to_string())
    }

    pub fn missing_flavor() -> Self {
        Self::BadRequest("flavorId is required".to_string())
    }

    pub fn no_steps() -> Self {
        Self::NotFound("No steps found for this flavor".to_string())
    }
}

impl From<DomainError> for PipelineError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::NotFound(message),
            DomainError::Validation { message } => Self::BadRequest(message),
            other => Self::Storage(other.to_string()),
        }
    }
}
