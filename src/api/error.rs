//! Error types for the course backend

use thiserror::Error;

/// Errors that can occur when talking to the course backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Failed to read the event stream
    #[error("Stream parsing error: {0}")]
    StreamParseError(String),

    /// Request was abandoned because the application is shutting down
    #[error("Request cancelled")]
    Cancelled,

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ApiError {
    /// Check if the user can reasonably try the same action again
    pub fn is_recoverable(&self) -> bool {
        match self {
            ApiError::RequestError(_) | ApiError::StreamParseError(_) => true,
            ApiError::ServerError { status, .. } => *status >= 500,
            ApiError::Cancelled | ApiError::JsonError(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_recoverable() {
        let err = ApiError::ServerError { status: 503, message: "busy".into() };
        assert!(err.is_recoverable());
    }

    #[test]
    fn client_errors_are_not_recoverable() {
        let err = ApiError::ServerError { status: 404, message: "no such chapter".into() };
        assert!(!err.is_recoverable());
        assert!(!ApiError::Cancelled.is_recoverable());
    }

    #[test]
    fn server_error_message_includes_status() {
        let err = ApiError::ServerError { status: 500, message: "boom".into() };
        assert_eq!(err.to_string(), "Server error (500): boom");
    }
}
