//! Catalog listing.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AppState;

pub fn list_agents(state: &AppState, json: bool) -> Result<()> {
    let catalog = state.orchestrator.catalog();

    if json {
        let agents: Vec<_> = catalog.agent_names().filter_map(|n| catalog.agent(n)).collect();
        let tasks: Vec<_> = catalog.task_names().filter_map(|n| catalog.task(n)).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "agents": agents, "tasks": tasks }))?
        );
        return Ok(());
    }

    if catalog.agent_names().next().is_none() {
        println!();
        println!(
            "  {} No agents loaded. Check {}",
            style("i").blue().bold(),
            style(state.config.catalog.agents_path.display()).yellow()
        );
        println!();
        return Ok(());
    }

    let mut agents = Table::new();
    agents.load_preset(presets::UTF8_FULL_CONDENSED);
    agents.set_content_arrangement(ContentArrangement::Dynamic);
    agents.set_header(vec![
        Cell::new("Agent").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Model").fg(Color::White),
    ]);
    for agent in catalog.agent_names().filter_map(|n| catalog.agent(n)) {
        agents.add_row(vec![
            Cell::new(&agent.name).fg(Color::Cyan),
            Cell::new(&agent.role),
            Cell::new(agent.model.as_deref().unwrap_or(&state.config.llm.model)),
        ]);
    }
    println!("{agents}");

    let mut tasks = Table::new();
    tasks.load_preset(presets::UTF8_FULL_CONDENSED);
    tasks.set_content_arrangement(ContentArrangement::Dynamic);
    tasks.set_header(vec![
        Cell::new("Task").fg(Color::White),
        Cell::new("Description").fg(Color::White),
    ]);
    for task in catalog.task_names().filter_map(|n| catalog.task(n)) {
        tasks.add_row(vec![
            Cell::new(&task.name).fg(Color::Cyan),
            Cell::new(&task.description),
        ]);
    }
    println!("{tasks}");
    Ok(())
}
