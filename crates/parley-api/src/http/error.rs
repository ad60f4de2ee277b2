//! Application error type mapping to HTTP status codes and envelope format.

use axum::response::{IntoResponse, Response};

use parley_types::error::RepositoryError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
///
/// Chat failures are not errors at this level: the orchestrator always
/// produces reply text. Only malformed requests and storage faults on the
/// maintenance endpoints surface here.
#[derive(Debug)]
pub enum AppError {
    /// Room, memory and history storage errors.
    Repository(RepositoryError),
    /// Unknown room.
    RoomNotFound(String),
    /// Malformed request.
    Validation(String),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl AppError {
    fn code_and_message(&self) -> (&'static str, String) {
        match self {
            AppError::Repository(e) => ("STORAGE_ERROR", e.to_string()),
            AppError::RoomNotFound(room_id) => {
                ("ROOM_NOT_FOUND", format!("Room '{room_id}' is not registered"))
            }
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = self.code_and_message();
        if code == "STORAGE_ERROR" {
            tracing::error!(%message, "request failed");
        }
        ApiResponse::error(code, &message, String::new(), 0).into_response()
    }
}
