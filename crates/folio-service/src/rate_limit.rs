//! Fixed-window request counting keyed by caller-supplied identifiers.
//!
//! Transport-agnostic core. Callers namespace the identifier themselves
//! (see [`crate::policy::Action::identifier`]) and each transport maps a
//! denied [`Decision`] to its own wire format.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::clock::{Clock, SystemClock};

/// Counter state for one identifier inside its active window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    /// Requests counted in the current window, never zero.
    pub count: u32,
    /// Epoch milliseconds at which this window ends.
    pub window_end_ms: u64,
}

impl RateLimitRecord {
    fn open(now_ms: u64, window_ms: u64) -> Self {
        Self {
            count: 1,
            window_end_ms: now_ms.saturating_add(window_ms),
        }
    }

    /// A window is still live at exactly `window_end_ms`.
    fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.window_end_ms
    }
}

/// Outcome of a single [`RateLimiter::check`] call.
///
/// `remaining` is a hint for the caller, not a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub remaining: u32,
    /// Epoch milliseconds at which the identifier's window resets.
    pub reset_at_ms: u64,
}

impl Decision {
    fn allowed(remaining: u32, reset_at_ms: u64) -> Self {
        Self {
            allowed: true,
            remaining,
            reset_at_ms,
        }
    }

    fn denied(reset_at_ms: u64) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            reset_at_ms,
        }
    }

    /// Whole seconds until the window resets, rounded up.
    pub fn retry_after_secs(&self, now_ms: u64) -> u64 {
        self.reset_at_ms.saturating_sub(now_ms).div_ceil(1000)
    }
}

/// In-memory fixed-window rate limiter, shared by cloning.
///
/// Each identifier's lookup, replacement and increment run under the
/// registry's per-shard lock, so the limit is exact within one process.
/// Separate processes keep separate registries.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<RateLimiterInner>,
}

struct RateLimiterInner {
    clock: Arc<dyn Clock>,
    records: DashMap<String, RateLimitRecord>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// Creates a limiter driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a limiter driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(RateLimiterInner {
                clock,
                records: DashMap::new(),
            }),
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }

    /// Counts a request for `identifier` against `limit` requests per `window`.
    ///
    /// Denied requests leave the record untouched: they neither increment the
    /// counter nor extend the window. A `limit` of zero denies everything
    /// without creating a record.
    pub fn check(&self, identifier: &str, limit: u32, window: Duration) -> Decision {
        let now = self.inner.clock.now_ms();
        let window_ms = window.as_millis() as u64;

        if limit == 0 {
            let reset_at_ms = self
                .inner
                .records
                .get(identifier)
                .filter(|record| !record.is_expired(now))
                .map_or(now.saturating_add(window_ms), |record| record.window_end_ms);
            return Decision::denied(reset_at_ms);
        }

        match self.inner.records.entry(identifier.to_owned()) {
            Entry::Vacant(slot) => {
                let record = RateLimitRecord::open(now, window_ms);
                slot.insert(record);
                Decision::allowed(limit - 1, record.window_end_ms)
            }
            Entry::Occupied(mut slot) => {
                let record = slot.get_mut();
                if record.is_expired(now) {
                    *record = RateLimitRecord::open(now, window_ms);
                    Decision::allowed(limit - 1, record.window_end_ms)
                } else if record.count >= limit {
                    Decision::denied(record.window_end_ms)
                } else {
                    record.count += 1;
                    Decision::allowed(limit - record.count, record.window_end_ms)
                }
            }
        }
    }

    /// Removes records whose window has ended. Returns the count removed.
    pub fn sweep(&self) -> usize {
        let now = self.inner.clock.now_ms();
        let mut removed = 0;
        self.inner.records.retain(|_, record| {
            let keep = !record.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Returns a copy of the record for `identifier`, expired or not.
    pub fn record(&self, identifier: &str) -> Option<RateLimitRecord> {
        self.inner.records.get(identifier).map(|r| *r)
    }

    /// Number of tracked identifiers, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.inner.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const START: u64 = 1_700_000_000_000;

    fn limiter() -> (RateLimiter, ManualClock) {
        let clock = ManualClock::new(START);
        (RateLimiter::with_clock(Arc::new(clock.clone())), clock)
    }

    #[test]
    fn login_scenario_allows_five_then_denies() {
        let (rl, _clock) = limiter();
        let window = Duration::from_millis(300_000);

        let remaining: Vec<u32> = (0..5)
            .map(|_| {
                let d = rl.check("login:1.2.3.4", 5, window);
                assert!(d.allowed);
                d.remaining
            })
            .collect();
        assert_eq!(remaining, vec![4, 3, 2, 1, 0]);

        let sixth = rl.check("login:1.2.3.4", 5, window);
        assert!(!sixth.allowed);
        assert_eq!(sixth.remaining, 0);
    }

    #[test]
    fn denial_reports_first_window_end() {
        let (rl, clock) = limiter();
        let window = Duration::from_secs(60);

        let first = rl.check("k", 2, window);
        assert_eq!(first.reset_at_ms, START + 60_000);

        clock.advance(Duration::from_secs(10));
        rl.check("k", 2, window);
        clock.advance(Duration::from_secs(10));
        let denied = rl.check("k", 2, window);

        assert!(!denied.allowed);
        assert_eq!(denied.reset_at_ms, first.reset_at_ms);
        assert_eq!(denied.retry_after_secs(clock.now_ms()), 40);
    }

    #[test]
    fn denied_requests_do_not_mutate_record() {
        let (rl, _clock) = limiter();
        let window = Duration::from_secs(60);

        rl.check("k", 1, window);
        let before = rl.record("k").unwrap();
        for _ in 0..5 {
            assert!(!rl.check("k", 1, window).allowed);
        }
        assert_eq!(rl.record("k").unwrap(), before);
    }

    #[test]
    fn window_resets_after_expiry() {
        let (rl, clock) = limiter();
        let window = Duration::from_secs(60);

        for _ in 0..4 {
            rl.check("k", 3, window);
        }
        assert!(!rl.check("k", 3, window).allowed);

        // Still inside the window at exactly window_end
        clock.advance(window);
        assert!(!rl.check("k", 3, window).allowed);

        clock.advance(Duration::from_millis(1));
        let fresh = rl.check("k", 3, window);
        assert!(fresh.allowed);
        assert_eq!(fresh.remaining, 2);
        assert_eq!(fresh.reset_at_ms, clock.now_ms() + 60_000);
        assert_eq!(rl.record("k").unwrap().count, 1);
    }

    #[test]
    fn identifiers_are_isolated() {
        let (rl, _clock) = limiter();
        let window = Duration::from_secs(60);

        rl.check("login:1.1.1.1", 1, window);
        assert!(!rl.check("login:1.1.1.1", 1, window).allowed);

        let other = rl.check("login:2.2.2.2", 1, window);
        assert!(other.allowed);
        let other_action = rl.check("signup:1.1.1.1", 1, window);
        assert!(other_action.allowed);
    }

    #[test]
    fn zero_limit_denies_without_creating_record() {
        let (rl, _clock) = limiter();
        let window = Duration::from_secs(60);

        let d = rl.check("k", 0, window);
        assert!(!d.allowed);
        assert_eq!(d.remaining, 0);
        assert_eq!(d.reset_at_ms, START + 60_000);
        assert!(rl.is_empty());
    }

    #[test]
    fn sweep_removes_only_expired_records() {
        let (rl, clock) = limiter();

        rl.check("short", 5, Duration::from_secs(1));
        rl.check("long", 5, Duration::from_secs(600));
        assert_eq!(rl.len(), 2);

        clock.advance(Duration::from_secs(2));
        assert_eq!(rl.sweep(), 1);
        assert!(rl.record("short").is_none());
        assert!(rl.record("long").is_some());

        clock.advance(Duration::from_secs(600));
        assert_eq!(rl.sweep(), 1);
        assert!(rl.is_empty());
    }

    #[test]
    fn memory_bounded_by_active_identifiers() {
        let (rl, clock) = limiter();
        let window = Duration::from_secs(60);

        for round in 0..10 {
            for i in 0..100 {
                rl.check(&format!("api:{round}-{i}"), 100, window);
            }
            clock.advance(Duration::from_secs(61));
            rl.sweep();
            assert!(rl.is_empty());
        }
    }

    #[test]
    fn retry_after_rounds_up_and_saturates() {
        let d = Decision::denied(10_001);
        assert_eq!(d.retry_after_secs(10_000), 1);
        assert_eq!(d.retry_after_secs(9_000), 2);
        assert_eq!(d.retry_after_secs(8_001), 2);
        assert_eq!(d.retry_after_secs(20_000), 0);
    }

    #[test]
    fn concurrent_checks_never_exceed_limit() {
        let rl = RateLimiter::new();
        let window = Duration::from_secs(60);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let rl = rl.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .filter(|_| rl.check("shared", 100, window).allowed)
                        .count()
                })
            })
            .collect();

        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, 100);
        assert_eq!(rl.record("shared").unwrap().count, 100);
    }
}
