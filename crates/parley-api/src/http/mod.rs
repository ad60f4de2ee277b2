//! HTTP/REST API layer for Parley.
//!
//! Axum-based REST API at `/api/v1/` with envelope response format and
//! CORS support. Chat adapters post messages or parsed commands here and
//! relay the reply text back to the room.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
