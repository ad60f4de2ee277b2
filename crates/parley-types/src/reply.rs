//! Outcome of one chat command.

use serde::{Deserialize, Serialize};

/// Which stage produced the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// Denied by the rate limiter before any other stage.
    RateLimited,
    /// Served from the response cache.
    Cache,
    /// Fresh agent output.
    Pipeline,
    /// The command named something that does not exist (agent, task, room).
    Rejected,
    /// The pipeline or the room registry failed.
    Failed,
}

/// Text sent back to the room, plus how it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    pub fn new(text: impl Into<String>, source: ReplySource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    /// True when the text is agent output rather than an error or refusal.
    pub fn is_answer(&self) -> bool {
        matches!(self.source, ReplySource::Cache | ReplySource::Pipeline)
    }
}
