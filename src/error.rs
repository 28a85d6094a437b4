//! Error types for the caching service
//!
//! Two layers: `CacheError` for the cache store and tag index, `AppError` for
//! everything a request handler can return.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Failures raised by a cache store or the tag index.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing store could not be reached or refused the operation
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// Key is empty or too long for the store
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    /// A value could not be converted to or from its cached representation
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == App Error Enum ==
/// Unified error type for the service and its HTTP surface.
#[derive(Error, Debug)]
pub enum AppError {
    /// Entity not found in the repository
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request or repository validation failure
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Cache store failure surfaced from the write path
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Cache(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Aliases ==
/// Convenience Result type for the service.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type for cache store operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("user 1".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Cache(CacheError::Unavailable("down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_cache_error_converts() {
        let err: AppError = CacheError::InvalidKey("".into()).into();
        assert!(matches!(err, AppError::Cache(CacheError::InvalidKey(_))));
        assert!(err.to_string().contains("Invalid cache key"));
    }
}
