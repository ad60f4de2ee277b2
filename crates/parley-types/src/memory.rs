//! Conversation window derived from a room's encrypted history.

use serde::{Deserialize, Serialize};

/// Marker opening a summarized window.
pub const SUMMARY_PREFIX: &str = "[SUMMARY OF PREVIOUS CONVERSATION]: ";

/// Marker separating the summary from the verbatim tail.
pub const RECENT_MARKER: &str = "[RECENT MESSAGES]:";

/// Marker opening a truncated window.
pub const OMISSION_MARKER: &str = "...[Earlier conversation omitted]...";

/// How the raw history was reduced to fit the token budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowCompaction {
    /// Full history, within budget.
    None,
    /// Replaced by a summary plus the most recent records.
    Summarized,
    /// Summarization failed; only the tail of the raw history is kept.
    Truncated,
}

/// Decrypted, ordered history passed as context to the agent pipeline.
///
/// Derived on every load; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationWindow {
    pub text: String,
    pub records_loaded: usize,
    pub records_skipped: usize,
    pub compaction: WindowCompaction,
}

impl ConversationWindow {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            records_loaded: 0,
            records_skipped: 0,
            compaction: WindowCompaction::None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Format one stored exchange.
pub fn format_exchange(user_text: &str, agent_text: &str) -> String {
    format!("User: {user_text}\nAI: {agent_text}")
}
