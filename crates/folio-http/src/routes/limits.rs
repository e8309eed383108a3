//! Limit checks on behalf of other route handlers.
//!
//! The web application's own handlers call this before doing any work,
//! forwarding the caller's proxy headers so the limiter sees the real client.

use axum::extract::{Json, Path, State};
use folio_service::policy::Action;

use crate::error::{ApiError, ErrorBody};
use crate::middleware::client_ip::ClientAddr;
use crate::state::AppState;
use crate::types::LimitCheckResponse;

/// Count one request for an action.
///
/// Returns the remaining quota when allowed, or 429 with a `Retry-After`
/// header and the action's message when the caller is over the limit.
#[utoipa::path(
    post,
    path = "/api/limits/{action}",
    params(
        ("action" = String, Path, description = "Action tag, e.g. `login` or `password-reset`"),
    ),
    responses(
        (status = 200, description = "Request allowed", body = LimitCheckResponse),
        (status = 404, description = "Unknown action", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = ErrorBody),
    ),
    tag = "Limits"
)]
pub async fn check_limit(
    State(state): State<AppState>,
    Path(action): Path<String>,
    ClientAddr(client): ClientAddr,
) -> Result<Json<LimitCheckResponse>, ApiError> {
    let action: Action = action.parse()?;
    let decision = state.enforce(action, &client)?;

    Ok(Json(LimitCheckResponse {
        action: action.tag().to_string(),
        remaining: decision.remaining,
        reset_at_ms: decision.reset_at_ms,
    }))
}
