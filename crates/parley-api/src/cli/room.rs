//! Room registry CLI commands: register, list, deactivate, remove.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AppState;

pub async fn register_room(state: &AppState, room_id: &str, json: bool) -> Result<()> {
    if room_id.trim().is_empty() {
        bail!("room id must not be empty");
    }
    let created = state.registry().register_room(room_id).await?;

    if json {
        println!("{}", serde_json::json!({"room_id": room_id, "created": created}));
    } else if created {
        println!(
            "  {} Room '{}' registered with a new key",
            style("✓").green().bold(),
            style(room_id).bold()
        );
    } else {
        println!(
            "  {} Room '{}' already registered (key kept, now active)",
            style("i").blue().bold(),
            style(room_id).bold()
        );
    }
    Ok(())
}

pub async fn list_rooms(state: &AppState, json: bool) -> Result<()> {
    let rooms = state.registry().list_rooms().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rooms)?);
        return Ok(());
    }

    if rooms.is_empty() {
        println!();
        println!(
            "  {} No rooms registered. Add one with: {}",
            style("i").blue().bold(),
            style("parley room register <room-id>").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Room").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Records").fg(Color::White),
        Cell::new("Registered").fg(Color::White),
    ]);

    for room in &rooms {
        let status = if room.active {
            Cell::new("active").fg(Color::Green)
        } else {
            Cell::new("inactive").fg(Color::DarkGrey)
        };
        let records = state.memory().store().count_records(&room.id).await?;
        table.add_row(vec![
            Cell::new(&room.id).fg(Color::Cyan),
            status,
            Cell::new(records),
            Cell::new(room.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!("{table}");
    Ok(())
}

pub async fn deactivate_room(state: &AppState, room_id: &str, json: bool) -> Result<()> {
    let found = state.registry().deactivate_room(room_id).await?;
    if !found {
        bail!("room '{room_id}' is not registered");
    }

    if json {
        println!("{}", serde_json::json!({"room_id": room_id, "active": false}));
    } else {
        println!(
            "  {} Room '{}' deactivated; the bot will ignore it until re-registered",
            style("✓").green().bold(),
            style(room_id).bold()
        );
    }
    Ok(())
}

/// Remove a room and its history. Without `--force` this only explains
/// what would be lost.
pub async fn remove_room(state: &AppState, room_id: &str, force: bool, json: bool) -> Result<()> {
    if !force {
        let records = state.memory().store().count_records(room_id).await?;
        println!(
            "  {} Removing '{}' destroys its key and {} stored exchange(s). Re-run with {}",
            style("!").yellow().bold(),
            style(room_id).bold(),
            records,
            style("--force").yellow()
        );
        return Ok(());
    }

    let Some(deleted) = state.registry().remove_room(room_id).await? else {
        bail!("room '{room_id}' is not registered");
    };

    if json {
        println!("{}", serde_json::json!({"room_id": room_id, "removed": true, "deleted": deleted}));
    } else {
        println!(
            "  {} Room '{}' removed ({} exchange(s) deleted)",
            style("✓").green().bold(),
            style(room_id).bold(),
            deleted
        );
    }
    Ok(())
}
