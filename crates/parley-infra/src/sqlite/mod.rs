//! SQLite storage: connection pool, room registry and history records.

pub mod pool;
pub mod record;
pub mod room;

pub use pool::DatabasePool;
pub use record::SqliteRecordStore;
pub use room::SqliteRoomRegistry;
