//! Error types for entity operations.

use restmodel_api::{ApiError, ValidationError};
use restmodel_executor::ExecutorError;
use thiserror::Error;

/// Result type for entity and collection operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors returned by entity lifecycle actions.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// The transport rejected or failed the request.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The action never produced a result.
    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl ModelError {
    /// The validation failure behind this error, if it is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ModelError::Api(err) => err.as_validation(),
            ModelError::Executor(_) => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.as_validation().is_some()
    }

    /// The HTTP status behind this error, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ModelError::Api(err) => err.status(),
            ModelError::Executor(_) => None,
        }
    }
}
