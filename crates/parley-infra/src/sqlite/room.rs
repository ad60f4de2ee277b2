//! SQLite room registry.
//!
//! Implements `RoomRegistry` from `parley-core` and adds the management
//! operations used by the CLI. Keys are stored base64-encoded and never
//! logged.

use chrono::{DateTime, Utc};
use sqlx::Row;

use parley_core::repository::RoomRegistry;
use parley_types::error::RepositoryError;
use parley_types::room::{RoomInfo, RoomKey};

use super::pool::DatabasePool;
use crate::crypto::{decode_room_key, encode_room_key, generate_room_key};

pub struct SqliteRoomRegistry {
    pool: DatabasePool,
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

impl SqliteRoomRegistry {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Register a room with a freshly generated key.
    ///
    /// Registering a known room reactivates it and keeps its existing key,
    /// so stored history stays readable. Returns whether a new room was created.
    pub async fn register_room(&self, room_id: &str) -> Result<bool, RepositoryError> {
        // A single statement so concurrent registrations cannot collide on the key.
        let inserted = sqlx::query(
            "INSERT INTO chat_rooms (id, room_key, active, created_at) VALUES (?, ?, 1, ?) \
             ON CONFLICT(id) DO NOTHING",
        )
        .bind(room_id)
        .bind(encode_room_key(&generate_room_key()))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .rows_affected()
            > 0;

        if inserted {
            tracing::info!(room_id, "room registered");
            return Ok(true);
        }

        sqlx::query("UPDATE chat_rooms SET active = 1 WHERE id = ?")
            .bind(room_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        tracing::info!(room_id, "room already registered, reactivated");
        Ok(false)
    }

    /// Stop serving a room without deleting its key.
    pub async fn deactivate_room(&self, room_id: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE chat_rooms SET active = 0 WHERE id = ?")
            .bind(room_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_rooms(&self) -> Result<Vec<RoomInfo>, RepositoryError> {
        let rows = sqlx::query("SELECT id, active, created_at FROM chat_rooms ORDER BY id")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let created_at: String = row
                    .try_get("created_at")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(RoomInfo {
                    id: row
                        .try_get("id")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    active: row
                        .try_get::<i64, _>("active")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?
                        != 0,
                    created_at: parse_datetime(&created_at)?,
                })
            })
            .collect()
    }

    /// Forget a room, its key and its stored history in one transaction.
    ///
    /// Returns the number of history records deleted, or `None` if the room
    /// was not registered (nothing is touched in that case).
    pub async fn remove_room(&self, room_id: &str) -> Result<Option<u64>, RepositoryError> {
        let query_err = |e: sqlx::Error| RepositoryError::Query(e.to_string());
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let deleted = sqlx::query("DELETE FROM chat_messages WHERE room_id = ?")
            .bind(room_id)
            .execute(&mut *tx)
            .await
            .map_err(query_err)?
            .rows_affected();
        let removed = sqlx::query("DELETE FROM chat_rooms WHERE id = ?")
            .bind(room_id)
            .execute(&mut *tx)
            .await
            .map_err(query_err)?
            .rows_affected();

        if removed == 0 {
            tx.rollback().await.map_err(query_err)?;
            return Ok(None);
        }
        tx.commit().await.map_err(query_err)?;
        tracing::info!(room_id, deleted, "room removed");
        Ok(Some(deleted))
    }
}

impl RoomRegistry for SqliteRoomRegistry {
    async fn lookup_room_key(&self, room_id: &str) -> Result<Option<RoomKey>, RepositoryError> {
        let row = sqlx::query("SELECT room_key FROM chat_rooms WHERE id = ? AND active = 1")
            .bind(room_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let encoded: String = row
            .try_get("room_key")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        decode_room_key(&encoded)
            .map(Some)
            .map_err(|e| RepositoryError::Query(format!("stored key for room {room_id}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::SqliteRecordStore;
    use crate::sqlite::pool::test_pool;
    use parley_core::repository::RecordStore;

    #[tokio::test]
    async fn test_register_then_lookup() {
        let (_dir, pool) = test_pool().await;
        let registry = SqliteRoomRegistry::new(pool);

        assert!(registry.lookup_room_key("lobby").await.unwrap().is_none());
        assert!(registry.register_room("lobby").await.unwrap());
        assert!(registry.lookup_room_key("lobby").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_reregister_keeps_key() {
        let (_dir, pool) = test_pool().await;
        let registry = SqliteRoomRegistry::new(pool);
        registry.register_room("lobby").await.unwrap();
        let first = registry.lookup_room_key("lobby").await.unwrap();

        assert!(!registry.register_room("lobby").await.unwrap());
        assert_eq!(registry.lookup_room_key("lobby").await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_concurrent_registration_creates_once() {
        let (_dir, pool) = test_pool().await;
        let registry = SqliteRoomRegistry::new(pool);

        let (a, b, c, d) = tokio::join!(
            registry.register_room("lobby"),
            registry.register_room("lobby"),
            registry.register_room("lobby"),
            registry.register_room("lobby"),
        );
        let created = [a.unwrap(), b.unwrap(), c.unwrap(), d.unwrap()];
        assert_eq!(created.iter().filter(|c| **c).count(), 1);
        assert_eq!(registry.list_rooms().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rooms_get_distinct_keys() {
        let (_dir, pool) = test_pool().await;
        let registry = SqliteRoomRegistry::new(pool);
        registry.register_room("a").await.unwrap();
        registry.register_room("b").await.unwrap();

        let a = registry.lookup_room_key("a").await.unwrap();
        let b = registry.lookup_room_key("b").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_inactive_room_has_no_key() {
        let (_dir, pool) = test_pool().await;
        let registry = SqliteRoomRegistry::new(pool);
        registry.register_room("lobby").await.unwrap();
        assert!(registry.deactivate_room("lobby").await.unwrap());

        assert!(registry.lookup_room_key("lobby").await.unwrap().is_none());
        let rooms = registry.list_rooms().await.unwrap();
        assert_eq!(rooms.len(), 1);
        assert!(!rooms[0].active);
    }

    #[tokio::test]
    async fn test_list_and_remove() {
        let (_dir, pool) = test_pool().await;
        let registry = SqliteRoomRegistry::new(pool);
        registry.register_room("kitchen").await.unwrap();
        registry.register_room("attic").await.unwrap();

        let ids: Vec<String> = registry
            .list_rooms()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["attic", "kitchen"]);

        assert_eq!(registry.remove_room("attic").await.unwrap(), Some(0));
        assert_eq!(registry.remove_room("attic").await.unwrap(), None);
        assert_eq!(registry.list_rooms().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_deletes_history_with_key() {
        let (_dir, pool) = test_pool().await;
        let registry = SqliteRoomRegistry::new(pool.clone());
        let records = SqliteRecordStore::new(pool);
        registry.register_room("lobby").await.unwrap();
        records.append_record("lobby", b"one").await.unwrap();
        records.append_record("lobby", b"two").await.unwrap();
        records.append_record("den", b"orphan").await.unwrap();

        assert_eq!(registry.remove_room("lobby").await.unwrap(), Some(2));
        assert_eq!(records.count_records("lobby").await.unwrap(), 0);
        assert_eq!(registry.remove_room("den").await.unwrap(), None);
        assert_eq!(records.count_records("den").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_stored_key_is_an_error() {
        let (_dir, pool) = test_pool().await;
        sqlx::query("INSERT INTO chat_rooms (id, room_key, active, created_at) VALUES ('bad', 'xx', 1, ?)")
            .bind(Utc::now().to_rfc3339())
            .execute(&pool.writer)
            .await
            .unwrap();
        let registry = SqliteRoomRegistry::new(pool);

        assert!(matches!(
            registry.lookup_room_key("bad").await,
            Err(RepositoryError::Query(_))
        ));
    }
}
