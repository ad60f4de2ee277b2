//! Chat command parsing.
//!
//! A message addressed to a bot reads `@<agent> [task] [content...]`.

/// Task used when a command names only the agent.
pub const DEFAULT_TASK: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCommand {
    pub agent: String,
    pub task: String,
    pub content: String,
}

impl ChatCommand {
    /// Parse a chat message body. Returns `None` when the message is not
    /// addressed to an agent.
    ///
    /// The body is split on single spaces into at most three parts, so the
    /// content keeps its inner spacing.
    pub fn parse(body: &str) -> Option<Self> {
        let rest = body.trim().strip_prefix('@')?;
        let mut parts = rest.splitn(3, ' ');

        let agent = parts.next().filter(|a| !a.is_empty())?;
        let task = parts.next().filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TASK);
        let content = parts.next().unwrap_or_default();

        Some(Self {
            agent: agent.to_string(),
            task: task.to_string(),
            content: content.to_string(),
        })
    }
}
