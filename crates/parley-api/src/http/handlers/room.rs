//! Room maintenance HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/rooms                            - List registered rooms
//! - POST   /api/v1/rooms                            - Register (or reactivate) a room
//! - DELETE /api/v1/rooms/{room_id}                  - Remove a room and its key
//! - DELETE /api/v1/rooms/{room_id}/memory           - Delete stored history
//! - DELETE /api/v1/rooms/{room_id}/sessions/{user}  - Forget one user's session

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use parley_types::room::RoomInfo;

use crate::http::error::AppError;
use crate::http::handlers::require_field;
use crate::http::response::{ApiResponse, RequestContext};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRoomRequest {
    pub room_id: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRoomResponse {
    pub room_id: String,
    /// False when an existing room was reactivated with its old key.
    pub created: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearMemoryResponse {
    pub room_id: String,
    pub deleted: u64,
}

/// GET /api/v1/rooms
pub async fn list_rooms(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<RoomInfo>>, AppError> {
    let ctx = RequestContext::start();
    let rooms = state.registry().list_rooms().await?;
    Ok(ctx.respond(Some(rooms)))
}

/// POST /api/v1/rooms
pub async fn register_room(
    State(state): State<AppState>,
    Json(request): Json<RegisterRoomRequest>,
) -> Result<ApiResponse<RegisterRoomResponse>, AppError> {
    let ctx = RequestContext::start();
    require_field("room_id", &request.room_id)?;

    let created = state.registry().register_room(&request.room_id).await?;
    tracing::info!(room_id = %request.room_id, created, "room registered");
    Ok(ctx.respond(Some(RegisterRoomResponse {
        room_id: request.room_id,
        created,
    })))
}

/// DELETE /api/v1/rooms/{room_id}
///
/// Also deletes the room's history (without its key it is unreadable);
/// key and history go together or not at all.
pub async fn remove_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<ApiResponse<ClearMemoryResponse>, AppError> {
    let ctx = RequestContext::start();
    let Some(deleted) = state.registry().remove_room(&room_id).await? else {
        return Err(AppError::RoomNotFound(room_id));
    };
    Ok(ctx.respond(Some(ClearMemoryResponse { room_id, deleted })))
}

/// DELETE /api/v1/rooms/{room_id}/memory
pub async fn clear_memory(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<ApiResponse<ClearMemoryResponse>, AppError> {
    let ctx = RequestContext::start();
    let deleted = state.memory().clear(&room_id).await?;
    tracing::info!(room_id = %room_id, deleted, "room memory cleared");
    Ok(ctx.respond(Some(ClearMemoryResponse { room_id, deleted })))
}

/// DELETE /api/v1/rooms/{room_id}/sessions/{user_id}
pub async fn clear_session(
    State(state): State<AppState>,
    Path((room_id, user_id)): Path<(String, String)>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let ctx = RequestContext::start();
    state
        .orchestrator
        .state()
        .sessions
        .clear(&user_id, &room_id);
    Ok(ctx.respond(Some(serde_json::json!({
        "room_id": room_id,
        "user_id": user_id,
    }))))
}
