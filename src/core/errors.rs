//! Custom error types for relay operations

use thiserror::Error;

/// Relay-related errors
#[derive(Error, Debug)]
pub enum RelayError {
    /// Upstream answered with a non-success status
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status returned by the upstream API
        status: u16,
        /// Raw upstream body, for operator logs only
        message: String,
    },

    /// Upstream could not be reached
    #[error("Network error: {message}")]
    NetworkError {
        /// Transport error detail
        message: String,
    },

    /// Upstream answered with an unexpected shape
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        /// What was wrong with the response
        message: String,
    },

    /// Upstream call exceeded the configured timeout
    #[error("Request timeout")]
    TimeoutError,

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What was wrong with the configuration
        message: String,
    },

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the absent field
        field: String,
    },
}

impl RelayError {
    /// True for failures caused by the upstream collaborator rather than the caller
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            RelayError::ApiError { .. }
                | RelayError::NetworkError { .. }
                | RelayError::InvalidResponseError { .. }
                | RelayError::TimeoutError
        )
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::TimeoutError
        } else if err.is_decode() {
            RelayError::InvalidResponseError {
                message: err.to_string(),
            }
        } else {
            RelayError::NetworkError {
                message: err.to_string(),
            }
        }
    }
}

/// Result type for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;
