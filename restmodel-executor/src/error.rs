//! Error types for the executor.

use thiserror::Error;
use tokio::task::JoinError;

/// Result type carried by every flight.
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Failures of the execution machinery itself, never of the wrapped action.
///
/// `Clone` because one result is handed to every caller of a shared flight.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// The action panicked.
    #[error("action panicked: {0}")]
    Panicked(String),

    /// The task running the action was cancelled (runtime shutdown).
    #[error("action was cancelled before completing")]
    Cancelled,

    /// `run` was called outside a tokio runtime.
    #[error("no tokio runtime available to run the action")]
    NoRuntime,
}

impl From<JoinError> for ExecutorError {
    fn from(err: JoinError) -> Self {
        if !err.is_panic() {
            return ExecutorError::Cancelled;
        }
        let payload = err.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        ExecutorError::Panicked(message)
    }
}
