//! SQLite implementation of the encrypted history store.
//!
//! Rows are opaque BLOBs; encryption happens in the memory layer before
//! they reach this repository.

use chrono::Utc;
use sqlx::Row;

use parley_core::repository::RecordStore;
use parley_types::error::RepositoryError;

use super::pool::DatabasePool;

pub struct SqliteRecordStore {
    pool: DatabasePool,
}

impl SqliteRecordStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Number of stored records for the room.
    pub async fn count_records(&self, room_id: &str) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM chat_messages WHERE room_id = ?")
            .bind(room_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let n: i64 = row
            .try_get("n")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(n as u64)
    }
}

impl RecordStore for SqliteRecordStore {
    async fn append_record(&self, room_id: &str, content: &[u8]) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO chat_messages (room_id, encrypted_content, created_at) VALUES (?, ?, ?)",
        )
        .bind(room_id)
        .bind(content)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn list_records(
        &self,
        room_id: &str,
        limit: usize,
    ) -> Result<Vec<Vec<u8>>, RepositoryError> {
        // Newest `limit` rows, returned oldest first.
        let rows = sqlx::query(
            "SELECT encrypted_content FROM (
                 SELECT id, encrypted_content FROM chat_messages
                 WHERE room_id = ? ORDER BY id DESC LIMIT ?
             ) ORDER BY id ASC",
        )
        .bind(room_id)
        .bind(limit as i64)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                row.try_get::<Vec<u8>, _>("encrypted_content")
                    .map_err(|e| RepositoryError::Query(e.to_string()))
            })
            .collect()
    }

    async fn delete_records(&self, room_id: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE room_id = ?")
            .bind(room_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(result.rows_affected())
    }

    async fn reconnect(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool.writer)
            .await
            .map_err(|_| RepositoryError::Connection)?;
        tracing::info!("record store connection re-validated");
        Ok(())
    }
}
