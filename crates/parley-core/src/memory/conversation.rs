//! Per-room conversation memory over the record store.

use parley_types::config::MemoryConfig;
use parley_types::error::RepositoryError;
use parley_types::memory::{ConversationWindow, WindowCompaction, format_exchange};
use parley_types::room::RoomKey;

use crate::cipher::ContentCipher;
use crate::memory::window;
use crate::pipeline::Summarizer;
use crate::repository::RecordStore;

/// Tag prefixed to an exchange stored without encryption.
pub const ENCRYPTION_FALLBACK_TAG: &str = "ERROR_ENCRYPTING: ";

/// Encrypted conversation history for every room.
///
/// Failures stay inside this type: an unreadable record is skipped, a failed
/// summary falls back to truncation, and a failed write is retried once then
/// dropped. None of them reach the chat.
pub struct ConversationMemory<S, C, Z> {
    store: S,
    cipher: C,
    summarizer: Z,
    config: MemoryConfig,
}

impl<S, C, Z> ConversationMemory<S, C, Z>
where
    S: RecordStore,
    C: ContentCipher,
    Z: Summarizer,
{
    pub fn new(store: S, cipher: C, summarizer: Z, config: MemoryConfig) -> Self {
        Self {
            store,
            cipher,
            summarizer,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decrypt the room's recent history and compact it to the token budget.
    #[tracing::instrument(skip(self, key))]
    pub async fn load(&self, room_id: &str, key: &RoomKey) -> ConversationWindow {
        let blobs = match self
            .store
            .list_records(room_id, self.config.max_records as usize)
            .await
        {
            Ok(blobs) => blobs,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read conversation history, continuing without it");
                return ConversationWindow::empty();
            }
        };

        let mut records = Vec::with_capacity(blobs.len());
        let mut skipped = 0;
        for (index, blob) in blobs.iter().enumerate() {
            match self.decrypt_record(key, blob) {
                Some(text) => records.push(text),
                None => {
                    skipped += 1;
                    tracing::warn!(index, "skipping history record that failed to decrypt");
                }
            }
        }

        if records.is_empty() {
            return ConversationWindow {
                records_skipped: skipped,
                ..ConversationWindow::empty()
            };
        }

        let history = records.join("\n");
        let (text, compaction) = self.compact(history, &records).await;
        ConversationWindow {
            text,
            records_loaded: records.len(),
            records_skipped: skipped,
            compaction,
        }
    }

    /// Persist one exchange. Never fails: errors are logged and the exchange
    /// is dropped after a single reconnect-and-retry.
    pub async fn append(&self, room_id: &str, key: &RoomKey, user_text: &str, agent_text: &str) {
        let plaintext = format_exchange(user_text, agent_text);
        let content = match self.cipher.encrypt(key, plaintext.as_bytes()) {
            Ok(ciphertext) => ciphertext,
            Err(e) => {
                tracing::error!(
                    security = true,
                    room_id,
                    error = %e,
                    "encryption failed, storing exchange unencrypted"
                );
                format!("{ENCRYPTION_FALLBACK_TAG}{plaintext}").into_bytes()
            }
        };

        let Err(first) = self.store.append_record(room_id, &content).await else {
            return;
        };
        tracing::warn!(room_id, error = %first, "failed to save exchange, reconnecting");

        if let Err(e) = self.store.reconnect().await {
            tracing::error!(room_id, error = %e, "reconnect failed, exchange not saved");
            return;
        }
        if let Err(e) = self.store.append_record(room_id, &content).await {
            tracing::error!(room_id, error = %e, "retry failed, exchange not saved");
        }
    }

    /// Delete the room's entire history.
    pub async fn clear(&self, room_id: &str) -> Result<u64, RepositoryError> {
        let removed = self.store.delete_records(room_id).await?;
        tracing::info!(room_id, removed, "cleared conversation history");
        Ok(removed)
    }

    fn decrypt_record(&self, key: &RoomKey, blob: &[u8]) -> Option<String> {
        let plaintext = self.cipher.decrypt(key, blob).ok()?;
        String::from_utf8(plaintext).ok()
    }

    async fn compact(&self, history: String, records: &[String]) -> (String, WindowCompaction) {
        let estimate = window::estimate_tokens(&history);
        if estimate <= f64::from(self.config.token_threshold) {
            return (history, WindowCompaction::None);
        }

        tracing::debug!(estimate, threshold = self.config.token_threshold, "history over budget, summarizing");
        match self.summarizer.summarize(&history).await {
            Ok(summary) => (
                window::summarized(&summary, records, self.config.recent_records),
                WindowCompaction::Summarized,
            ),
            Err(e) => {
                tracing::warn!(error = %e, "summarization failed, truncating history");
                (
                    window::truncated(&history, self.config.truncate_chars),
                    WindowCompaction::Truncated,
                )
            }
        }
    }
}
