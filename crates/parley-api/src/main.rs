//! Parley CLI and REST API entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, initializes storage and the orchestrator, then
//! dispatches to the appropriate command handler or starts the REST API
//! server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use tokio_util::sync::CancellationToken;

use parley_core::sweeper::spawn_sweeper;
use parley_observe::{LogFormat, TracingOptions, filter_for_verbosity, init_tracing, shutdown_tracing};

use cli::{Cli, Commands, MemoryAction, RoomAction};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The server logs requests at info unless told otherwise.
    let verbose = match cli.command {
        Commands::Serve { .. } => cli.verbose.max(1),
        _ => cli.verbose,
    };
    init_tracing(&TracingOptions {
        default_filter: filter_for_verbosity(cli.quiet, verbose).to_string(),
        format: if cli.log_json { LogFormat::Json } else { LogFormat::Text },
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { host, port } => serve(state, &host, port).await?,

        Commands::Ask { user, room, message } => {
            cli::ask::ask(&state, &user, &room, &message.join(" "), cli.json).await?;
        }

        Commands::Room { action } => match action {
            RoomAction::Register { room_id } => {
                cli::room::register_room(&state, &room_id, cli.json).await?;
            }
            RoomAction::List => cli::room::list_rooms(&state, cli.json).await?,
            RoomAction::Deactivate { room_id } => {
                cli::room::deactivate_room(&state, &room_id, cli.json).await?;
            }
            RoomAction::Remove { room_id, force } => {
                cli::room::remove_room(&state, &room_id, force, cli.json).await?;
            }
        },

        Commands::Memory { action } => match action {
            MemoryAction::Show { room_id } => {
                cli::memory::show_memory(&state, &room_id, cli.json).await?;
            }
            MemoryAction::Clear { room_id } => {
                cli::memory::clear_memory(&state, &room_id, cli.json).await?;
            }
        },

        Commands::Agents => cli::agents::list_agents(&state, cli.json)?,

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    shutdown_tracing();
    Ok(())
}

/// Run the REST API with the background sweeper until Ctrl+C or SIGTERM.
async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let cancel = CancellationToken::new();
    let layer = state.orchestrator.state();
    let sweeper = spawn_sweeper(
        layer.cache.clone(),
        layer.sessions.clone(),
        layer.limiter.clone(),
        state.config.sweep.interval(),
        cancel.clone(),
    );

    println!(
        "  {} Parley API listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancel.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "sweeper task ended abnormally");
    }

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
