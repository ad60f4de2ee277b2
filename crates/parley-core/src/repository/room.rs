//! Room key registry trait.

use parley_types::error::RepositoryError;
use parley_types::room::RoomKey;

/// Lookup of the symmetric key registered for a room.
///
/// Registration and removal are management operations handled by the
/// infrastructure implementation; the core only reads.
pub trait RoomRegistry: Send + Sync {
    /// The room's key, or `None` if the room is not registered or inactive.
    fn lookup_room_key(
        &self,
        room_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<RoomKey>, RepositoryError>> + Send;
}
