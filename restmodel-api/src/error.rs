//! Classified transport failures.

use crate::validation::ValidationError;
use serde_json::Value;
use thiserror::Error;

/// Result type for transport operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Message reported for a 401 without a description.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthenticated";

/// Errors raised at the transport boundary.
///
/// `Clone` so a single failure can be handed to every caller sharing one
/// in-flight request.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 422 with per-field messages.
    #[error("validation failed: {0}")]
    Validation(ValidationError),

    /// 401.
    #[error("unauthorized: {description}")]
    Unauthorized {
        error: Option<String>,
        description: String,
        data: Option<Value>,
    },

    /// 404.
    #[error("resource not found")]
    NotFound { data: Option<Value> },

    /// Any other non-success response.
    #[error("API request failed with status {status}: {message}")]
    Response { status: u16, message: String },

    /// No response was received.
    #[error("network error: {0}")]
    Network(String),

    /// Anything that could not be classified.
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Classifies a non-success response from its status and decoded body.
    pub fn from_response(status: u16, body: &Value) -> Self {
        if ValidationError::is_validation_status(status) {
            return ApiError::Validation(ValidationError::from_response_body(body));
        }
        match status {
            401 => ApiError::Unauthorized {
                error: body.get("error").and_then(Value::as_str).map(str::to_string),
                description: body
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .unwrap_or(UNAUTHORIZED_MESSAGE)
                    .to_string(),
                data: body.get("data").cloned(),
            },
            404 => ApiError::NotFound {
                data: body.get("data").cloned(),
            },
            _ => ApiError::Response {
                status,
                message: body
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or_else(|| body.as_str().map(str::to_string))
                    .unwrap_or_default(),
            },
        }
    }

    /// Classifies a reqwest failure that carries no response.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            ApiError::Network(err.to_string())
        } else {
            ApiError::Other(err.to_string())
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ApiError::Validation(validation) => Some(validation),
            _ => None,
        }
    }

    /// The HTTP status behind this error, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation(_) => Some(crate::validation::VALIDATION_STATUS),
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Response { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Other(_) => None,
        }
    }
}
