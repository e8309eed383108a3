//! Background eviction of expired rate-limit records.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::ServiceState;

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Spawns a task that sweeps the limiter every `interval`, forever.
///
/// Lazy expiry in `check()` already keeps stale records harmless; the sweep
/// reclaims memory held by identifiers that never return.
pub fn spawn_sweeper(state: ServiceState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let removed = state.sweep();
            if removed > 0 {
                tracing::debug!(
                    removed,
                    tracked = state.rate_limiter().len(),
                    "Swept expired rate-limit records"
                );
            }
        }
    })
}
