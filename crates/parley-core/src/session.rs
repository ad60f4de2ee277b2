//! Session store keyed by `(user_id, room_id)`.
//!
//! Each pair has at most one live [`Session`]. Any access refreshes the
//! session's activity time; an access after the inactivity timeout replaces
//! the session with a fresh one (new id, empty context). A periodic
//! [`SessionStore::sweep_expired`] bounds memory for pairs that never return.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::time::Instant;

use parley_types::config::SessionConfig;
use parley_types::session::Session;

struct SessionSlot {
    session: Session,
    last_seen: Instant,
}

impl SessionSlot {
    fn fresh(user_id: &str, room_id: &str) -> Self {
        Self {
            session: Session::new(user_id, room_id),
            last_seen: Instant::now(),
        }
    }

    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }

    fn touch(&mut self) {
        self.last_seen = Instant::now();
        self.session.last_activity_at = Utc::now();
    }
}

/// In-memory store of live sessions.
///
/// Creation, expiry and context mutation for a pair are atomic with respect
/// to each other: they run under the map's per-key entry lock. Callers get
/// owned snapshots, so reading a returned session never holds a lock.
pub struct SessionStore {
    sessions: DashMap<(String, String), SessionSlot>,
    timeout: Duration,
}

impl SessionStore {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            timeout,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.timeout())
    }

    /// Return the live session for the pair, creating or replacing it as needed.
    pub fn get_or_create(&self, user_id: &str, room_id: &str) -> Session {
        self.with_live_session(user_id, room_id, |slot| slot.session.clone())
    }

    /// Set one context value on the pair's live session.
    pub fn update_context(
        &self,
        user_id: &str,
        room_id: &str,
        key: &str,
        value: serde_json::Value,
    ) {
        self.with_live_session(user_id, room_id, |slot| {
            slot.session.context.insert(key.to_string(), value);
        });
    }

    /// Mutate the pair's context under its entry lock.
    ///
    /// Read-modify-write updates (counters, paired fields) must go through
    /// here so concurrent commands for the same pair do not interleave.
    pub fn update_context_with<R>(
        &self,
        user_id: &str,
        room_id: &str,
        f: impl FnOnce(&mut HashMap<String, serde_json::Value>) -> R,
    ) -> R {
        self.with_live_session(user_id, room_id, |slot| f(&mut slot.session.context))
    }

    /// Read one context value from the pair's live session.
    pub fn get_context(
        &self,
        user_id: &str,
        room_id: &str,
        key: &str,
        default: serde_json::Value,
    ) -> serde_json::Value {
        self.with_live_session(user_id, room_id, |slot| {
            slot.session.context_value(key, default)
        })
    }

    /// Forget the pair's session, if any.
    pub fn clear(&self, user_id: &str, room_id: &str) {
        if self
            .sessions
            .remove(&(user_id.to_string(), room_id.to_string()))
            .is_some()
        {
            tracing::debug!(user_id, room_id, "cleared session");
        }
    }

    /// Remove every session idle past the timeout. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, slot| !slot.is_expired(self.timeout));
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            tracing::debug!(removed, "swept expired sessions");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn with_live_session<R>(
        &self,
        user_id: &str,
        room_id: &str,
        f: impl FnOnce(&mut SessionSlot) -> R,
    ) -> R {
        let key = (user_id.to_string(), room_id.to_string());
        match self.sessions.entry(key) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired(self.timeout) {
                    tracing::debug!(user_id, room_id, "session expired, starting a new one");
                    occupied.insert(SessionSlot::fresh(user_id, room_id));
                } else {
                    occupied.get_mut().touch();
                }
                f(occupied.get_mut())
            }
            Entry::Vacant(vacant) => {
                tracing::debug!(user_id, room_id, "created new session");
                let mut slot = SessionSlot::fresh(user_id, room_id);
                let result = f(&mut slot);
                vacant.insert(slot);
                result
            }
        }
    }
}
