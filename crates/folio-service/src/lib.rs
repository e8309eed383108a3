//! Folio Service: request-gating core for the Folio portfolio builder API.
//!
//! This crate contains all transport-agnostic logic:
//! fixed-window rate limiting, the per-action policy table, background
//! sweeping, metrics, and resume field extraction.
//!
//! Transport crates (`folio-http`) depend on this crate and provide
//! protocol-specific adapters.
//!
//! **Zero transport dependencies**: no axum, no HTTP types.

pub mod clock;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod rate_limit;
pub mod resume;
pub mod sweeper;

use std::sync::Arc;
use std::time::{Duration, Instant};

use clock::{Clock, SystemClock};
use error::ServiceError;
use metrics::Metrics;
use policy::Action;
use rate_limit::{Decision, RateLimiter};

/// Configuration subset relevant to the service layer.
///
/// Transport-specific config (bind address, CORS origins) stays in the
/// binary crate's `Config` struct.
pub struct ServiceConfig {
    pub sweep_interval: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            sweep_interval: sweeper::DEFAULT_SWEEP_INTERVAL,
        }
    }
}

/// Shared service state, cloneable across all transport handlers.
///
/// Constructed once at startup and handed to every handler; there is no
/// process-global limiter.
#[derive(Clone)]
pub struct ServiceState {
    inner: Arc<Inner>,
}

struct Inner {
    rate_limiter: RateLimiter,
    metrics: Metrics,
    sweep_interval: Duration,
    start_time: Instant,
}

impl ServiceState {
    /// Creates a new service state from config.
    pub fn new(config: &ServiceConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a service state whose limiter reads time from `clock`.
    pub fn with_clock(config: &ServiceConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                rate_limiter: RateLimiter::with_clock(clock),
                metrics: Metrics::new(),
                sweep_interval: config.sweep_interval,
                start_time: Instant::now(),
            }),
        }
    }

    // --- Accessors ---

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.inner.rate_limiter
    }

    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }

    pub fn sweep_interval(&self) -> Duration {
        self.inner.sweep_interval
    }

    pub fn uptime_secs(&self) -> u64 {
        self.inner.start_time.elapsed().as_secs()
    }

    // --- Rate limiting ---

    /// Runs the limiter for `action` on behalf of `client`.
    pub fn check_action(&self, action: Action, client: &str) -> Decision {
        let policy = action.policy();
        let decision =
            self.inner
                .rate_limiter
                .check(&action.identifier(client), policy.limit, policy.window);
        self.inner.metrics.record_decision(action, decision.allowed);

        if !decision.allowed {
            tracing::warn!(%action, client, "rate limit exceeded");
        }
        decision
    }

    /// Like [`check_action`](Self::check_action), but turns a denial into
    /// [`ServiceError::RateLimited`] carrying the retry hint.
    pub fn enforce(&self, action: Action, client: &str) -> Result<Decision, ServiceError> {
        let decision = self.check_action(action, client);
        if decision.allowed {
            Ok(decision)
        } else {
            let now = self.inner.rate_limiter.clock().now_ms();
            Err(ServiceError::RateLimited {
                message: action.denial_message().to_string(),
                retry_after_secs: decision.retry_after_secs(now),
            })
        }
    }

    // --- Maintenance ---

    /// Evicts expired limiter records. Returns count removed.
    pub fn sweep(&self) -> usize {
        let removed = self.inner.rate_limiter.sweep();
        self.inner.metrics.record_swept(removed);
        removed
    }

    /// Render Prometheus metrics with live gauges filled in.
    pub fn render_metrics(&self) -> String {
        self.inner
            .metrics
            .render(self.inner.rate_limiter.len(), self.uptime_secs())
    }
}
