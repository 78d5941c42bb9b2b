//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Remote Error Enum ==
/// Failure reported by a remote key-value store.
///
/// The proxy never retries these; they are handed back to the caller as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The store could not be reached or refused the operation
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with something we could not interpret
    #[error("remote store protocol error: {0}")]
    Protocol(String),
}

// == Proxy Error Enum ==
/// Unified error type for the caching proxy.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Key is empty or contains the namespace separator
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Key absent from both tiers
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or rejected credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Wrong administrative code presented for provisioning
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Identity already exists in the credential registry
    #[error("User from invite code {0} already exists")]
    AlreadyProvisioned(String),

    /// Remote store failure
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// HTTP method not supported on key paths
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::InvalidKey(_) | ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::NotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::Unauthorized => StatusCode::UNAUTHORIZED,
            ProxyError::Forbidden(_) => StatusCode::FORBIDDEN,
            ProxyError::AlreadyProvisioned(_) => StatusCode::CONFLICT,
            ProxyError::Remote(_) => StatusCode::BAD_GATEWAY,
            ProxyError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
