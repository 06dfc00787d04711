//! API error types and responses.
//!
//! Every failure is reported as `500 {"error": "..."}` except a write outside
//! the project root, which gets a plain-text 403 so callers can tell a
//! security rejection apart from an ordinary failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use cockpit_core::{ConfigError, GuardError};

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body is not JSON of the expected shape.
    #[error("Invalid JSON: {0}")]
    InvalidBody(String),

    /// The request body could not be read (too large or interrupted).
    #[error("Invalid request body: {0}")]
    UnreadableBody(String),

    /// An execution adapter reported a failure.
    #[error("{0}")]
    Execution(String),

    /// The write target lies outside the project root.
    #[error("Forbidden: Path outside project root")]
    Forbidden,

    /// The project configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidBody(_)
            | Self::UnreadableBody(_)
            | Self::Execution(_)
            | Self::Config(_)
            | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if matches!(self, Self::Forbidden) {
            return (status, message).into_response();
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<GuardError> for ApiError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::OutsideRoot { .. } | GuardError::Unresolvable { .. } => Self::Forbidden,
            GuardError::Root { .. } => {
                tracing::error!(error = %err, "Project root unavailable");
                Self::Internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_status_codes() {
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::InvalidBody("eof".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Execution("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::UnreadableBody("length limit exceeded".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn guard_errors_map_to_distinct_statuses() {
        let outside = ApiError::from(GuardError::OutsideRoot {
            path: PathBuf::from("/etc/passwd"),
        });
        assert!(matches!(outside, ApiError::Forbidden));

        let looped = ApiError::from(GuardError::Unresolvable {
            path: PathBuf::from("/project/a"),
        });
        assert_eq!(looped.status_code(), StatusCode::FORBIDDEN);

        let root = ApiError::from(GuardError::Root {
            path: PathBuf::from("/gone"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        });
        assert_eq!(root.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_body_message() {
        let err = ApiError::InvalidBody("expected value at line 1 column 1".into());
        assert_eq!(
            err.to_string(),
            "Invalid JSON: expected value at line 1 column 1"
        );
    }
}
