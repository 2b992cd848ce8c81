use thiserror::Error;

use crate::api::Operation;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Outcome of a request that did not return the expected status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{operation} was rejected with status 400")]
    BadRequest { operation: Operation },
    #[error("{operation} returned status {status}, expected {}", .operation.expected_status())]
    UnexpectedStatus { operation: Operation, status: u16 },
    #[error("{operation} request failed: {message}")]
    Transport { operation: Operation, message: String },
    #[error("{operation} response could not be decoded: {message}")]
    Decode { operation: Operation, message: String },
}

impl ApiError {
    pub fn operation(&self) -> Operation {
        match self {
            ApiError::BadRequest { operation }
            | ApiError::UnexpectedStatus { operation, .. }
            | ApiError::Transport { operation, .. }
            | ApiError::Decode { operation, .. } => *operation,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::BadRequest { .. })
    }

    /// Text shown to the user in a blocking alert.
    ///
    /// Only 400 gets its own message; transport and decode failures share the
    /// text of an unexpected status.
    pub fn alert_message(&self) -> String {
        if self.is_client_error() {
            "There was an error 400".to_string()
        } else {
            format!(
                "something else other than {} was returned",
                self.operation().expected_status()
            )
        }
    }
}
