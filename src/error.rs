//! Error types for the user cache
//!
//! Provides unified error handling using thiserror.
//!
//! Store-level failures are not errors here: they surface as `false`, `0`
//! or `None` from the facade. Only startup and usage problems are raised.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the user cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing store did not answer the capability probe
    #[error("Cache store unavailable: {0}")]
    StoreUnavailable(String),

    /// A write was attempted without a key
    #[error("A key name must be given")]
    MissingKey,

    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::MissingKey => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the user cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message() {
        assert_eq!(CacheError::MissingKey.to_string(), "A key name must be given");
    }

    #[test]
    fn test_error_status_codes() {
        let cases = vec![
            (
                CacheError::StoreUnavailable("probe failed".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (CacheError::MissingKey, StatusCode::BAD_REQUEST),
            (CacheError::NotFound("k".to_string()), StatusCode::NOT_FOUND),
            (
                CacheError::InvalidRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
