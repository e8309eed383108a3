//! Per-action rate-limiting middleware.
//!
//! The limiter runs before the wrapped handler does any work, so a denial
//! never hides or replaces a downstream error.

use std::net::SocketAddr;

use axum::Router;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use folio_service::policy::Action;

use crate::error::ApiError;
use crate::middleware::client_ip::resolve_client;
use crate::state::AppState;

/// Middleware state binding the shared app state to one action.
#[derive(Clone)]
pub struct ActionGuard {
    state: AppState,
    action: Action,
}

impl ActionGuard {
    pub fn new(state: AppState, action: Action) -> Self {
        Self { state, action }
    }
}

/// Returns 429 with `Retry-After` when the client exceeded the action's limit.
pub async fn rate_limit_middleware(
    State(guard): State<ActionGuard>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = resolve_client(
        req.headers(),
        req.extensions().get::<ConnectInfo<SocketAddr>>(),
    );
    guard.state.enforce(guard.action, &client)?;

    Ok(next.run(req).await)
}

/// Wraps every route currently in `router` with the limiter for `action`.
pub fn guarded<S>(router: Router<S>, state: &AppState, action: Action) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(axum::middleware::from_fn_with_state(
        ActionGuard::new(state.clone(), action),
        rate_limit_middleware,
    ))
}
