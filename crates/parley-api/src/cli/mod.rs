//! CLI command definitions and dispatch for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing. Resource commands follow a
//! noun-verb pattern (e.g., `parley room register lobby`).

pub mod agents;
pub mod ask;
pub mod memory;
pub mod room;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Multi-agent chat bot with encrypted per-room memory.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Also export spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on.
        #[arg(long, short, default_value_t = 3000)]
        port: u16,
    },

    /// Send one chat message through the bot and print the reply.
    Ask {
        /// Sender identity.
        #[arg(long, short, default_value = "cli")]
        user: String,

        /// Room the message is posted in.
        #[arg(long, short)]
        room: String,

        /// Message text, e.g. `@writer summarize hello there`.
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },

    /// Manage registered rooms.
    Room {
        #[command(subcommand)]
        action: RoomAction,
    },

    /// Inspect or clear a room's stored history.
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },

    /// List agents and tasks from the catalog.
    Agents,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum RoomAction {
    /// Register a room, generating its encryption key.
    Register {
        room_id: String,
    },

    /// List registered rooms.
    #[command(alias = "ls")]
    List,

    /// Deactivate a room without deleting its key or history.
    Deactivate {
        room_id: String,
    },

    /// Remove a room, its key and its history.
    #[command(alias = "rm")]
    Remove {
        room_id: String,

        /// Skip confirmation.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum MemoryAction {
    /// Print the context the bot would load for a room.
    Show {
        room_id: String,
    },

    /// Delete every stored exchange for a room.
    Clear {
        room_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_collects_trailing_words() {
        let cli = Cli::try_parse_from([
            "parley", "ask", "--room", "lobby", "@writer", "default", "hello", "there",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask { user, room, message } => {
                assert_eq!(user, "cli");
                assert_eq!(room, "lobby");
                assert_eq!(message.join(" "), "@writer default hello there");
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["parley", "serve"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve { ref host, port: 3000 } if host == "127.0.0.1"
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["parley", "room", "list", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Room { action: RoomAction::List }
        ));
    }

    #[test]
    fn test_ask_requires_room() {
        assert!(Cli::try_parse_from(["parley", "ask", "@writer hi"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
