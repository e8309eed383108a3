//! Folio HTTP: REST transport adapter for the Folio API gate.
//!
//! Provides the HTTP interface including:
//! - Limit checks for the web application's sensitive routes
//! - Resume field extraction
//! - System/health and Prometheus metrics endpoints
//! - OpenAPI/Swagger UI
//! - Rate limiting and request-ID middleware

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod types;

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use folio_service::policy::Action;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use error::ErrorBody;
use middleware::rate_limit::guarded;

pub use state::AppState;

// ---------------------------------------------------------------------------
// OpenAPI
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Folio API",
        description = "Request gate for the Folio portfolio builder.\n\nSensitive actions (login, signup, password reset, OTP verification, resume parsing, portfolio generation) are throttled per client address with fixed-window limits. Denied requests receive HTTP 429 with a `Retry-After` header.",
        version = "0.3.0",
        license(name = "Apache-2.0"),
    ),
    paths(
        routes::system::health,
        routes::resume::parse_resume,
        routes::limits::check_limit,
    ),
    components(
        schemas(
            types::HealthResponse, types::ParseResumeRequest, types::LimitCheckResponse,
            folio_service::resume::ResumeFields, ErrorBody,
        )
    ),
    tags(
        (name = "Limits", description = "Rate-limit checks for sensitive actions"),
        (name = "Resume", description = "Resume field extraction"),
        (name = "System", description = "System and health endpoints"),
    )
)]
struct ApiDoc;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Builds the HTTP API router.
///
/// Health and metrics stay unthrottled for monitoring. Resume parsing is
/// throttled under its own action; limit checks count against the action
/// named in the path.
pub fn router(state: AppState) -> Router {
    let resume = guarded(
        Router::new().route("/api/resume/parse", post(routes::resume::parse_resume)),
        &state,
        Action::ResumeParse,
    );

    let api = Router::new()
        .route("/api/limits/{action}", post(routes::limits::check_limit))
        .merge(resume)
        .route("/health", get(routes::system::health))
        .route("/metrics", get(routes::system::metrics_endpoint))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(
            middleware::request_id::request_id_middleware,
        ))
        .layer(cors_layer(&state))
        .with_state(state);

    api.merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
}

/// Serve the HTTP router on the given listener with graceful shutdown.
///
/// Wraps `axum::serve` with `ConnectInfo<SocketAddr>` so the limiter can
/// fall back to the peer address when no proxy header is present.
pub async fn serve(
    listener: tokio::net::TcpListener,
    app: Router,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let origins = state.cors_origins();

    // No origins configured → no CORS headers (deny cross-origin by default).
    if origins.is_empty() {
        return CorsLayer::new();
    }

    let x_request_id = middleware::request_id::X_REQUEST_ID.clone();
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            x_request_id.clone(),
        ])
        .expose_headers([x_request_id, axum::http::header::RETRY_AFTER]);

    if origins.len() == 1 && origins[0] == "*" {
        tracing::warn!("CORS configured with wildcard origin, all cross-origin requests allowed");
        base.allow_origin(tower_http::cors::Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        base.allow_origin(parsed)
    }
}
