//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"ok"` when the server can answer.
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Identifiers currently held by the rate limiter.
    pub tracked_identifiers: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ParseResumeRequest {
    /// Plain resume text, e.g. OCR output.
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LimitCheckResponse {
    /// Action tag the request was counted against.
    pub action: String,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Epoch milliseconds at which the window resets.
    pub reset_at_ms: u64,
}
