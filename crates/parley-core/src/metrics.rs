//! Request metrics recorder.
//!
//! Counts requests and errors and keeps a rolling window of the last
//! [`RESPONSE_TIME_WINDOW`] response times. One recorder is shared by every
//! in-flight command; [`MetricsRecorder::snapshot`] returns a copy.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use parley_types::metrics::{MetricsSnapshot, RESPONSE_TIME_WINDOW};

#[derive(Default)]
struct MetricsState {
    request_count: u64,
    error_count: u64,
    response_times_ms: VecDeque<f64>,
    last_request_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct MetricsRecorder {
    state: Mutex<MetricsState>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request_start(&self) {
        let mut state = self.state.lock().expect("metrics lock poisoned");
        state.request_count += 1;
        state.last_request_at = Some(Utc::now());
    }

    pub fn record_error(&self) {
        self.state.lock().expect("metrics lock poisoned").error_count += 1;
    }

    pub fn record_response_time(&self, ms: f64) {
        let mut state = self.state.lock().expect("metrics lock poisoned");
        if state.response_times_ms.len() == RESPONSE_TIME_WINDOW {
            state.response_times_ms.pop_front();
        }
        state.response_times_ms.push_back(ms);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.state.lock().expect("metrics lock poisoned");
        let response_times_ms: Vec<f64> = state.response_times_ms.iter().copied().collect();
        let avg_response_time_ms = if response_times_ms.is_empty() {
            0.0
        } else {
            response_times_ms.iter().sum::<f64>() / response_times_ms.len() as f64
        };
        MetricsSnapshot {
            request_count: state.request_count,
            error_count: state.error_count,
            response_times_ms,
            last_request_at: state.last_request_at,
            avg_response_time_ms,
        }
    }

    /// Run `operation`, recording its start, its failure (once) and its
    /// elapsed time.
    ///
    /// The elapsed time is recorded even if the future fails or is dropped
    /// before completing. The operation's result is returned unchanged.
    pub async fn instrument<T, E, F>(&self, name: &str, operation: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.record_request_start();
        let _timer = ResponseTimer {
            metrics: self,
            name,
            started: Instant::now(),
        };

        let result = operation.await;
        if result.is_err() {
            self.record_error();
        }
        result
    }
}

/// Records elapsed time on drop.
struct ResponseTimer<'a> {
    metrics: &'a MetricsRecorder,
    name: &'a str,
    started: Instant,
}

impl Drop for ResponseTimer<'_> {
    fn drop(&mut self) {
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.metrics.record_response_time(elapsed_ms);
        tracing::info!(operation = self.name, elapsed_ms, "{} took {:.2}ms", self.name, elapsed_ms);
    }
}
