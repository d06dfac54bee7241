//! Error types for the caching layer
//!
//! Provides unified error handling using thiserror. Only `Configuration`
//! ever reaches callers of [`crate::Cache`]; the other variants are produced
//! by backend handles and the HTTP surface and are absorbed before they can
//! break a caller's control flow.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the caching layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid or unrecognized construction input
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// External daemon or shared-memory extension could not be reached
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The external daemon answered with something we could not understand
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Key absent or expired (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::BackendUnavailable(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::BackendUnavailable(msg) | CacheError::Protocol(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
            CacheError::Configuration(msg) | CacheError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching layer.
pub type Result<T> = std::result::Result<T, CacheError>;
