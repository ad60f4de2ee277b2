//! Fixed-window per-user rate limiter.
//!
//! The first request from a user opens a window `[now, now + window)` with
//! count 1. Requests inside the window are allowed until the count reaches
//! `max_requests`; later ones are denied until the window closes. A user can
//! therefore burst up to twice the limit across a window boundary.

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use parley_types::config::RateLimitConfig;

/// Request counter for one user's current window.
struct RateWindow {
    count: u32,
    reset_at: Instant,
}

pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    windows: DashMap<String, RateWindow>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            windows: DashMap::new(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.window(), config.max_requests)
    }

    /// Count one request from `user_id` and report whether it may proceed.
    ///
    /// Expired windows of every user are purged first, so a user whose
    /// window has closed starts a fresh one.
    pub fn allow(&self, user_id: &str) -> bool {
        let now = Instant::now();
        // Must run before `entry` below: retain locks every shard.
        self.windows.retain(|_, w| w.reset_at > now);

        let mut entry = self
            .windows
            .entry(user_id.to_string())
            .or_insert_with(|| RateWindow {
                count: 0,
                reset_at: now + self.window,
            });
        let window = entry.value_mut();

        if window.count >= self.max_requests {
            tracing::warn!(
                user_id,
                count = window.count,
                max_requests = self.max_requests,
                "rate limit exceeded"
            );
            return false;
        }
        window.count += 1;
        true
    }

    /// Drop every closed window. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.windows.len();
        self.windows.retain(|_, w| w.reset_at > now);
        before.saturating_sub(self.windows.len())
    }

    /// Number of users with an open window.
    pub fn tracked_users(&self) -> usize {
        self.windows.len()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("window", &self.window)
            .field("max_requests", &self.max_requests)
            .field("tracked_users", &self.windows.len())
            .finish()
    }
}
