//! Lightweight Prometheus-compatible metrics using atomic counters.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::policy::Action;

/// Per-action limiter outcomes.
struct ActionMetrics {
    allowed_total: AtomicU64,
    denied_total: AtomicU64,
}

impl ActionMetrics {
    const fn new() -> Self {
        Self {
            allowed_total: AtomicU64::new(0),
            denied_total: AtomicU64::new(0),
        }
    }
}

/// Application-wide metrics collected via atomic counters.
pub struct Metrics {
    actions: [ActionMetrics; Action::ALL.len()],
    swept_total: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            actions: [const { ActionMetrics::new() }; Action::ALL.len()],
            swept_total: AtomicU64::new(0),
        }
    }

    fn action(&self, action: Action) -> &ActionMetrics {
        let idx = match action {
            Action::Login => 0,
            Action::Signup => 1,
            Action::PasswordReset => 2,
            Action::VerifyOtp => 3,
            Action::ResumeParse => 4,
            Action::PortfolioGenerate => 5,
            Action::Api => 6,
        };
        &self.actions[idx]
    }

    /// Record the outcome of one limiter check.
    pub fn record_decision(&self, action: Action, allowed: bool) {
        let m = self.action(action);
        if allowed {
            m.allowed_total.fetch_add(1, Ordering::Relaxed);
        } else {
            m.denied_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record records evicted by a sweep.
    pub fn record_swept(&self, removed: usize) {
        self.swept_total.fetch_add(removed as u64, Ordering::Relaxed);
    }

    pub fn allowed_total(&self, action: Action) -> u64 {
        self.action(action).allowed_total.load(Ordering::Relaxed)
    }

    pub fn denied_total(&self, action: Action) -> u64 {
        self.action(action).denied_total.load(Ordering::Relaxed)
    }

    pub fn swept_total(&self) -> u64 {
        self.swept_total.load(Ordering::Relaxed)
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn render(&self, tracked_identifiers: usize, uptime_seconds: u64) -> String {
        let mut out = String::with_capacity(1024);

        gauge(
            &mut out,
            "folio_rate_limit_tracked_identifiers",
            "Identifiers currently held by the rate limiter",
            tracked_identifiers,
        );
        gauge(
            &mut out,
            "folio_uptime_seconds",
            "Server uptime in seconds",
            uptime_seconds,
        );

        writeln!(
            out,
            "# HELP folio_rate_limit_swept_total Expired records evicted by the sweeper."
        )
        .unwrap();
        writeln!(out, "# TYPE folio_rate_limit_swept_total counter").unwrap();
        writeln!(out, "folio_rate_limit_swept_total {}", self.swept_total()).unwrap();

        writeln!(
            out,
            "# HELP folio_rate_limit_allowed_total Requests allowed by the rate limiter."
        )
        .unwrap();
        writeln!(out, "# TYPE folio_rate_limit_allowed_total counter").unwrap();
        for action in Action::ALL {
            let tag = action.tag();
            let total = self.allowed_total(action);
            writeln!(out, "folio_rate_limit_allowed_total{{action=\"{tag}\"}} {total}").unwrap();
        }

        writeln!(
            out,
            "# HELP folio_rate_limit_denied_total Requests rejected by the rate limiter."
        )
        .unwrap();
        writeln!(out, "# TYPE folio_rate_limit_denied_total counter").unwrap();
        for action in Action::ALL {
            let tag = action.tag();
            let total = self.denied_total(action);
            writeln!(out, "folio_rate_limit_denied_total{{action=\"{tag}\"}} {total}").unwrap();
        }

        out
    }
}

fn gauge(out: &mut String, name: &str, help: &str, value: impl std::fmt::Display) {
    writeln!(out, "# HELP {name} {help}").unwrap();
    writeln!(out, "# TYPE {name} gauge").unwrap();
    writeln!(out, "{name} {value}").unwrap();
}
