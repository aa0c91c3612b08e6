//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::Unauthenticated`] → 401
/// - [`ServiceError::Forbidden`] → 403
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::DataIntegrity`] → 500
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed, e.g. invalid JSON or an unparsable id.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The caller identity header is missing or names no known principal.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The caller is not authorized to access the requested record.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A stored encrypted value is corrupt or failed authentication.
    ///
    /// The message never says which check failed.
    #[error("data integrity fault: {0}")]
    DataIntegrity(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::Unauthenticated(_) => 401,
            ServiceError::Forbidden(_) => 403,
            ServiceError::NotFound(_) => 404,
            ServiceError::DataIntegrity(_) => 500,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::Unauthenticated(_) => "unauthenticated",
            ServiceError::Forbidden(_) => "forbidden",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::DataIntegrity(_) => "data_integrity",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
