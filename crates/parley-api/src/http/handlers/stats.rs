//! Runtime statistics and cache control.
//!
//! Endpoints:
//! - GET    /api/v1/metrics - Request counters, response times and state sizes
//! - GET    /api/v1/agents  - Agent and task names from the catalog
//! - DELETE /api/v1/cache   - Drop every cached response

use axum::extract::State;
use serde::Serialize;

use parley_types::metrics::MetricsSnapshot;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestContext};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    #[serde(flatten)]
    pub metrics: MetricsSnapshot,
    pub cache_entries: usize,
    pub active_sessions: usize,
    pub rate_limited_users: usize,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub agents: Vec<String>,
    pub tasks: Vec<String>,
}

/// GET /api/v1/metrics
pub async fn get_metrics(
    State(state): State<AppState>,
) -> Result<ApiResponse<MetricsResponse>, AppError> {
    let ctx = RequestContext::start();
    let layer = state.orchestrator.state();
    Ok(ctx.respond(Some(MetricsResponse {
        metrics: layer.metrics.snapshot(),
        cache_entries: layer.cache.len(),
        active_sessions: layer.sessions.len(),
        rate_limited_users: layer.limiter.tracked_users(),
    })))
}

/// GET /api/v1/agents
pub async fn list_catalog(
    State(state): State<AppState>,
) -> Result<ApiResponse<CatalogResponse>, AppError> {
    let ctx = RequestContext::start();
    let catalog = state.orchestrator.catalog();
    Ok(ctx.respond(Some(CatalogResponse {
        agents: catalog.agent_names().map(String::from).collect(),
        tasks: catalog.task_names().map(String::from).collect(),
    })))
}

/// DELETE /api/v1/cache
pub async fn clear_cache(
    State(state): State<AppState>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let ctx = RequestContext::start();
    let cache = &state.orchestrator.state().cache;
    let cleared = cache.len();
    cache.clear();
    tracing::info!(cleared, "response cache cleared");
    Ok(ctx.respond(Some(serde_json::json!({ "cleared": cleared }))))
}
