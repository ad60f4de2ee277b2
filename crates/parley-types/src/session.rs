//! Per-(user, room) conversational session.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Conversational state for one user in one room.
///
/// At most one live session exists per `(user_id, room_id)` pair. A session
/// that outlives the inactivity timeout is replaced by a fresh one with a new
/// `id` and an empty `context`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: String,
    pub room_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub context: HashMap<String, serde_json::Value>,
}

impl Session {
    /// Open a new session with a time-sortable identity and empty context.
    pub fn new(user_id: impl Into<String>, room_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            room_id: room_id.into(),
            created_at: now,
            last_activity_at: now,
            context: HashMap::new(),
        }
    }

    /// Read a context value, falling back to `default` when absent.
    pub fn context_value(&self, key: &str, default: serde_json::Value) -> serde_json::Value {
        self.context.get(key).cloned().unwrap_or(default)
    }
}
