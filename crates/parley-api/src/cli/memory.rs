//! Room memory CLI commands: show, clear.

use anyhow::{Result, bail};
use console::style;

use parley_core::repository::RoomRegistry;

use crate::state::AppState;

/// Print the context window the bot would send with the next command.
pub async fn show_memory(state: &AppState, room_id: &str, json: bool) -> Result<()> {
    let Some(key) = state.registry().lookup_room_key(room_id).await? else {
        bail!("room '{room_id}' is not registered or inactive");
    };
    let window = state.memory().load(room_id, &key).await;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "room_id": room_id,
                "records_loaded": window.records_loaded,
                "records_skipped": window.records_skipped,
                "compaction": window.compaction,
                "text": window.text,
            })
        );
        return Ok(());
    }

    if window.is_empty() {
        println!("  {} No history for '{}'", style("i").blue().bold(), style(room_id).bold());
        return Ok(());
    }

    println!(
        "  {} records, {} skipped, {:?}",
        style(window.records_loaded).cyan(),
        window.records_skipped,
        window.compaction
    );
    println!();
    println!("{}", window.text);
    Ok(())
}

pub async fn clear_memory(state: &AppState, room_id: &str, json: bool) -> Result<()> {
    let deleted = state.memory().clear(room_id).await?;

    if json {
        println!("{}", serde_json::json!({"room_id": room_id, "deleted": deleted}));
    } else {
        println!(
            "  {} Cleared {} exchange(s) from '{}'",
            style("✓").green().bold(),
            deleted,
            style(room_id).bold()
        );
    }
    Ok(())
}
