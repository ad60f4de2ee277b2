//! Chat HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/rooms/{room_id}/messages - Raw chat message (`@agent task content`)
//! - POST /api/v1/commands                 - Pre-parsed command
//!
//! Both always answer 200 with the reply in `data`; rate limiting, unknown
//! agents and pipeline failures are ordinary replies, not HTTP errors.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use parley_core::command::DEFAULT_TASK;
use parley_types::reply::Reply;

use crate::http::error::AppError;
use crate::http::handlers::require_field;
use crate::http::response::{ApiResponse, RequestContext};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub user_id: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct PostCommandRequest {
    pub user_id: String,
    pub room_id: String,
    pub agent: String,
    #[serde(default)]
    pub task: Option<String>,
    pub content: String,
}

/// POST /api/v1/rooms/{room_id}/messages
///
/// `data` is null when the message is not addressed to a known agent.
pub async fn post_message(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<PostMessageRequest>,
) -> Result<ApiResponse<Reply>, AppError> {
    let ctx = RequestContext::start();
    require_field("user_id", &request.user_id)?;

    let reply = state
        .orchestrator
        .handle_message(&request.user_id, &room_id, &request.body)
        .await;

    tracing::info!(
        request_id = %ctx.request_id,
        room_id = %room_id,
        answered = reply.is_some(),
        "message handled"
    );
    Ok(ctx.respond(reply))
}

/// POST /api/v1/commands
pub async fn post_command(
    State(state): State<AppState>,
    Json(request): Json<PostCommandRequest>,
) -> Result<ApiResponse<Reply>, AppError> {
    let ctx = RequestContext::start();
    require_field("user_id", &request.user_id)?;
    require_field("room_id", &request.room_id)?;
    require_field("agent", &request.agent)?;

    let task = request
        .task
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TASK);

    let reply = state
        .orchestrator
        .handle_command_detailed(
            &request.user_id,
            &request.room_id,
            &request.agent,
            task,
            &request.content,
        )
        .await;

    tracing::info!(
        request_id = %ctx.request_id,
        source = ?reply.source,
        "command handled"
    );
    Ok(ctx.respond(Some(reply)))
}
