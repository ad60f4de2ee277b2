//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/` except the liveness check.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Chat
        .route(
            "/rooms/{room_id}/messages",
            post(handlers::chat::post_message),
        )
        .route("/commands", post(handlers::chat::post_command))
        // Rooms
        .route(
            "/rooms",
            get(handlers::room::list_rooms).post(handlers::room::register_room),
        )
        .route("/rooms/{room_id}", delete(handlers::room::remove_room))
        .route(
            "/rooms/{room_id}/memory",
            delete(handlers::room::clear_memory),
        )
        .route(
            "/rooms/{room_id}/sessions/{user_id}",
            delete(handlers::room::clear_session),
        )
        // Stats and cache
        .route("/metrics", get(handlers::stats::get_metrics))
        .route("/agents", get(handlers::stats::list_catalog))
        .route("/cache", delete(handlers::stats::clear_cache));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint (no envelope).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use parley_types::config::ParleyConfig;

    use super::*;

    const AGENTS: &str = "writer:\n  role: Writer\n  goal: Write short replies\n";
    const TASKS: &str = "default:\n  description: \"Reply to: {content}\"\n  expected_output: A reply\n";

    async fn test_state(config: ParleyConfig) -> (TempDir, AppState) {
        let tmp = TempDir::new().unwrap();
        let config_dir = tmp.path().join("config");
        tokio::fs::create_dir_all(&config_dir).await.unwrap();
        tokio::fs::write(config_dir.join("agents.yaml"), AGENTS).await.unwrap();
        tokio::fs::write(config_dir.join("tasks.yaml"), TASKS).await.unwrap();

        let state = AppState::build(tmp.path().to_path_buf(), config, tmp.path())
            .await
            .unwrap();
        (tmp, state)
    }

    async fn send(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health_check() {
        let (_tmp, state) = test_state(ParleyConfig::default()).await;
        let (status, body) = send(&state, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_non_command_message_gets_null_reply() {
        let (_tmp, state) = test_state(ParleyConfig::default()).await;
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/rooms/lobby/messages",
            Some(json!({"user_id": "alice", "body": "just chatting"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].is_null());
        assert!(!body["meta"]["request_id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_command_for_unregistered_room_is_rejected_reply() {
        let (_tmp, state) = test_state(ParleyConfig::default()).await;
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/rooms/lobby/messages",
            Some(json!({"user_id": "alice", "body": "@writer default hello"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["text"], "Error: Room not registered");
        assert_eq!(body["data"]["source"], "rejected");
    }

    #[tokio::test]
    async fn test_command_defaults_task_and_reports_unknown_agent() {
        let (_tmp, state) = test_state(ParleyConfig::default()).await;
        let (_, body) = send(
            &state,
            Method::POST,
            "/api/v1/commands",
            Some(json!({"user_id": "alice", "room_id": "lobby", "agent": "poet", "content": "hi"})),
        )
        .await;
        assert_eq!(body["data"]["text"], "Unknown agent: poet");
    }

    #[tokio::test]
    async fn test_cached_reply_served_without_pipeline() {
        let (_tmp, state) = test_state(ParleyConfig::default()).await;
        state
            .orchestrator
            .state()
            .cache
            .set("writer", "default", "hello", "cached hello");

        let (_, body) = send(
            &state,
            Method::POST,
            "/api/v1/commands",
            Some(json!({"user_id": "alice", "room_id": "lobby", "agent": "writer", "content": "hello"})),
        )
        .await;
        assert_eq!(body["data"]["text"], "cached hello");
        assert_eq!(body["data"]["source"], "cache");
    }

    #[tokio::test]
    async fn test_rate_limited_reply() {
        let mut config = ParleyConfig::default();
        config.rate_limit.max_requests = 1;
        let (_tmp, state) = test_state(config).await;
        state.orchestrator.state().cache.set("writer", "default", "hi", "hey");

        let request = json!({"user_id": "alice", "room_id": "lobby", "agent": "writer", "content": "hi"});
        let (_, first) = send(&state, Method::POST, "/api/v1/commands", Some(request.clone())).await;
        let (_, second) = send(&state, Method::POST, "/api/v1/commands", Some(request)).await;

        assert_eq!(first["data"]["source"], "cache");
        assert_eq!(second["data"]["text"], "Rate limit exceeded. Please try again later.");
        assert_eq!(second["data"]["source"], "rate_limited");
    }

    #[tokio::test]
    async fn test_blank_user_is_validation_error() {
        let (_tmp, state) = test_state(ParleyConfig::default()).await;
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/rooms/lobby/messages",
            Some(json!({"user_id": "  ", "body": "@writer hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_room_lifecycle() {
        let (_tmp, state) = test_state(ParleyConfig::default()).await;

        let (_, created) = send(&state, Method::POST, "/api/v1/rooms", Some(json!({"room_id": "lobby"}))).await;
        assert_eq!(created["data"]["created"], true);
        let (_, again) = send(&state, Method::POST, "/api/v1/rooms", Some(json!({"room_id": "lobby"}))).await;
        assert_eq!(again["data"]["created"], false);

        let (_, listed) = send(&state, Method::GET, "/api/v1/rooms", None).await;
        assert_eq!(listed["data"][0]["id"], "lobby");

        let (status, removed) = send(&state, Method::DELETE, "/api/v1/rooms/lobby", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(removed["data"]["deleted"], 0);
        let (status, body) = send(&state, Method::DELETE, "/api/v1/rooms/lobby", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["code"], "ROOM_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_clear_memory_reports_deleted_count() {
        let (_tmp, state) = test_state(ParleyConfig::default()).await;
        let (status, body) = send(&state, Method::DELETE, "/api/v1/rooms/lobby/memory", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["deleted"], 0);
    }

    #[tokio::test]
    async fn test_metrics_and_cache_clear() {
        let (_tmp, state) = test_state(ParleyConfig::default()).await;
        state.orchestrator.state().cache.set("writer", "default", "a", "1");
        state.orchestrator.state().sessions.get_or_create("alice", "lobby");

        let (_, metrics) = send(&state, Method::GET, "/api/v1/metrics", None).await;
        assert_eq!(metrics["data"]["request_count"], 0);
        assert_eq!(metrics["data"]["cache_entries"], 1);
        assert_eq!(metrics["data"]["active_sessions"], 1);

        let (_, cleared) = send(&state, Method::DELETE, "/api/v1/cache", None).await;
        assert_eq!(cleared["data"]["cleared"], 1);
        assert!(state.orchestrator.state().cache.is_empty());

        send(&state, Method::DELETE, "/api/v1/rooms/lobby/sessions/alice", None).await;
        assert!(state.orchestrator.state().sessions.is_empty());
    }

    #[tokio::test]
    async fn test_agents_lists_catalog() {
        let (_tmp, state) = test_state(ParleyConfig::default()).await;
        let (_, body) = send(&state, Method::GET, "/api/v1/agents", None).await;
        assert_eq!(body["data"]["agents"], json!(["writer"]));
        assert_eq!(body["data"]["tasks"], json!(["default"]));
    }

    #[tokio::test]
    async fn test_missing_catalog_still_serves() {
        let tmp = TempDir::new().unwrap();
        let state = AppState::build(tmp.path().to_path_buf(), ParleyConfig::default(), Path::new("/nonexistent"))
            .await
            .unwrap();
        let (_, body) = send(&state, Method::GET, "/api/v1/agents", None).await;
        assert_eq!(body["data"]["agents"], json!([]));
    }
}
