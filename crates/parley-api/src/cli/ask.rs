//! One-shot chat from the command line.

use anyhow::Result;
use console::style;

use parley_types::reply::ReplySource;

use crate::state::AppState;

/// Run one message through the full orchestration path and print the reply.
///
/// Uses the same cache, rate limiter and room memory as the server, so a
/// registered room's history grows with every answered `ask`.
pub async fn ask(state: &AppState, user: &str, room: &str, message: &str, json: bool) -> Result<()> {
    let reply = state.orchestrator.handle_message(user, room, message).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    match reply {
        None => {
            println!(
                "  {} Not a command for a known agent. Try: {}",
                style("i").blue().bold(),
                style("@<agent> [task] <content>").yellow()
            );
        }
        Some(reply) => {
            let marker = match reply.source {
                ReplySource::Pipeline | ReplySource::Cache => style("›").green().bold(),
                ReplySource::RateLimited | ReplySource::Rejected => style("!").yellow().bold(),
                ReplySource::Failed => style("✗").red().bold(),
            };
            println!("  {marker} {}", reply.text);
            if reply.source == ReplySource::Cache {
                println!("  {}", style("(cached)").dim());
            }
        }
    }
    Ok(())
}
