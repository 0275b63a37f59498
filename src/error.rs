//! Error types for Council Core.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error type for Council Core operations.
#[derive(Debug, Error)]
pub enum CouncilError {
    /// Missing, malformed or expired user credential.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Missing or wrong admin key.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The server lacks configuration a request path depends on.
    #[error("Misconfigured: {0}")]
    Misconfigured(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CouncilError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            CouncilError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            CouncilError::Forbidden(_) => StatusCode::FORBIDDEN,
            CouncilError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CouncilError::NotFound(_) => StatusCode::NOT_FOUND,
            CouncilError::Conflict(_) => StatusCode::CONFLICT,
            CouncilError::Misconfigured(_)
            | CouncilError::Io(_)
            | CouncilError::Serialization(_)
            | CouncilError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for CouncilError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match &self {
            CouncilError::Unauthenticated(msg) => ("UNAUTHENTICATED", msg.clone(), None),
            CouncilError::Forbidden(msg) => ("FORBIDDEN", msg.clone(), None),
            CouncilError::Misconfigured(msg) => {
                tracing::error!(error = %msg, "Server misconfiguration");
                ("MISCONFIGURED", msg.clone(), None)
            }
            CouncilError::BadRequest(msg) => ("BAD_REQUEST", msg.clone(), None),
            CouncilError::NotFound(msg) => ("NOT_FOUND", msg.clone(), None),
            CouncilError::Conflict(msg) => ("CONFLICT", msg.clone(), None),
            CouncilError::Io(e) => {
                // Log the actual error but don't expose paths
                tracing::error!(error = %e, "Storage I/O error");
                (
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                    None,
                )
            }
            CouncilError::Serialization(e) => (
                "SERIALIZATION_ERROR",
                "Failed to process stored data".to_string(),
                Some(e.to_string()),
            ),
            CouncilError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for Council operations.
pub type CouncilResult<T> = Result<T, CouncilError>;
