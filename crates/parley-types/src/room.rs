//! Room identity and symmetric room keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Size of a room key in bytes (AES-256).
pub const ROOM_KEY_LEN: usize = 32;

/// Symmetric key protecting a room's conversation history at rest.
///
/// `Debug` is redacted so keys never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct RoomKey([u8; ROOM_KEY_LEN]);

impl RoomKey {
    pub fn new(bytes: [u8; ROOM_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a key from a byte slice, rejecting anything but exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; ROOM_KEY_LEN] = bytes.try_into().ok()?;
        Some(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; ROOM_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RoomKey(<redacted>)")
    }
}

/// A room known to the registry (key material excluded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub id: String,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
