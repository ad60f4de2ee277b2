//! Durable store of encrypted conversation records.

use parley_types::error::RepositoryError;

/// Append-only, per-room store of opaque (encrypted) history records.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in parley-infra.
pub trait RecordStore: Send + Sync {
    /// Append one record to the room's history.
    fn append_record(
        &self,
        room_id: &str,
        content: &[u8],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The most recent `limit` records for the room, oldest first and newest last.
    fn list_records(
        &self,
        room_id: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Vec<u8>>, RepositoryError>> + Send;

    /// Delete every record for the room. Returns how many were removed.
    fn delete_records(
        &self,
        room_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Re-validate the backing connection after a failed write.
    fn reconnect(&self) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
