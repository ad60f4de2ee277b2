//! Periodic cleanup of expired in-memory state.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::cache::ResponseCache;
use crate::rate_limit::RateLimiter;
use crate::session::SessionStore;

/// Sweep the cache, sessions and rate windows every `interval` until
/// `cancel` fires.
///
/// Each sweep takes the component's own lock, so it runs safely alongside
/// live requests. Lookups still expire entries lazily; this only bounds
/// memory held for keys that are never read again.
pub fn spawn_sweeper(
    cache: Arc<ResponseCache>,
    sessions: Arc<SessionStore>,
    limiter: Arc<RateLimiter>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let cache_entries = cache.clear_expired();
                    let sessions_removed = sessions.sweep_expired();
                    let windows = limiter.sweep_expired();
                    tracing::debug!(cache_entries, sessions_removed, windows, "sweep complete");
                }
            }
        }
    })
}
