//! Encrypted, auto-summarizing conversation memory.
//!
//! History is stored per room as encrypted records through the
//! [`RecordStore`](crate::repository::RecordStore) port. Loading decrypts
//! what it can and compacts the result when it exceeds the token budget.

pub mod conversation;
pub mod window;

pub use conversation::ConversationMemory;
