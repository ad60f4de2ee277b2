use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of response times kept in the rolling window.
pub const RESPONSE_TIME_WINDOW: usize = 100;

/// Point-in-time copy of the process-wide request metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub request_count: u64,
    pub error_count: u64,
    /// Most recent response times in milliseconds, oldest first.
    pub response_times_ms: Vec<f64>,
    pub last_request_at: Option<DateTime<Utc>>,
    /// Mean of `response_times_ms` (0 when empty).
    pub avg_response_time_ms: f64,
}
