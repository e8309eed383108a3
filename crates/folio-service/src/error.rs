//! Service-layer error types.
//!
//! `ServiceError` is transport-agnostic. Each transport maps it to its own
//! wire format (HTTP status codes for `folio-http`).

/// Service error shared across all transports.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Request payload failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Rate limit exceeded for an action.
    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after_secs: u64,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}
