//! Token estimation and compaction of a decrypted history.

use parley_types::memory::{OMISSION_MARKER, RECENT_MARKER, SUMMARY_PREFIX};

/// Rough token estimate: whitespace-separated words times 1.3.
pub fn estimate_tokens(text: &str) -> f64 {
    text.split_whitespace().count() as f64 * 1.3
}

/// The last `max_chars` characters of `text`, split on a char boundary.
pub fn tail_chars(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    let start = text
        .char_indices()
        .nth(total - max_chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[start..]
}

/// A summary followed by the most recent records verbatim.
pub fn summarized(summary: &str, records: &[String], recent: usize) -> String {
    let skip = records.len().saturating_sub(recent);
    let tail = records[skip..].join("\n");
    format!("{SUMMARY_PREFIX}{summary}\n\n{RECENT_MARKER}\n{tail}")
}

/// The end of the raw history behind an omission marker.
pub fn truncated(history: &str, max_chars: usize) -> String {
    format!("{OMISSION_MARKER}\n\n{}", tail_chars(history, max_chars))
}
