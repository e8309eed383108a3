//! HTTP error mapping.
//!
//! Every error, including a rate-limit denial, is rendered as
//! `{"error": "<message>"}`. Denials also carry a `Retry-After` header.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use folio_service::error::ServiceError;
use serde::Serialize;
use utoipa::ToSchema;

/// API error returned by handlers and middleware.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request payload failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("{message}")]
    TooManyRequests {
        message: String,
        retry_after_secs: u64,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub(crate) error: String,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::BadRequest(msg) => Self::BadRequest(msg),
            ServiceError::NotFound(msg) => Self::NotFound(msg),
            ServiceError::RateLimited {
                message,
                retry_after_secs,
            } => Self::TooManyRequests {
                message,
                retry_after_secs,
            },
            ServiceError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, retry_after, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, None, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, None, msg),
            ApiError::TooManyRequests {
                message,
                retry_after_secs,
            } => (StatusCode::TOO_MANY_REQUESTS, Some(retry_after_secs), message),
            ApiError::Internal(msg) => {
                // Detail stays in the server log
                tracing::error!(%msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    None,
                    "Internal server error".to_string(),
                )
            }
        };

        let mut response = (status, axum::Json(ErrorBody { error: message })).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn rate_limited_sets_retry_after() {
        let err: ApiError = ServiceError::RateLimited {
            message: "Too many login attempts. Please try again later.".to_string(),
            retry_after_secs: 299,
        }
        .into();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "299");

        let body = body_json(response).await;
        assert_eq!(
            body,
            serde_json::json!({"error": "Too many login attempts. Please try again later."})
        );
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let response = ApiError::Internal("pool exhausted".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());

        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn bad_request_maps_to_400() {
        let err: ApiError = ServiceError::BadRequest("text must not be empty".to_string()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "text must not be empty");
    }
}
