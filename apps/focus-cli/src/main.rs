//! # focus-cli
//!
//! Command-line interface for session focus tracking.
//!
//! Hooks and humans use it to keep an agent session's goal hierarchy current:
//! - `focus goal push/pop/current/show/history` — manipulate and inspect the stack
//! - `focus event task/issue` — convert upstream events into goals and push them
//! - `focus global` — show the shared cross-session focus pointer
//! - `focus session start/id/list/cleanup` — session bookkeeping and archival

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use focus_session::{resolve_session_id, FocusConfig};
use tracing_subscriber::EnvFilter;

use commands::FocusContext;

/// Focus — track what an agent session is working on.
#[derive(Parser)]
#[command(name = "focus", version, about)]
struct Cli {
    /// Focus home directory (defaults to $FOCUS_HOME, then ~/.focus).
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Session id (defaults to $FOCUS_SESSION_ID, then one derived from the parent process).
    #[arg(long, global = true)]
    session: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push, pop, and inspect goals in this session.
    Goal {
        #[command(subcommand)]
        command: commands::goal::GoalCommands,
    },
    /// Turn upstream task/issue events into goals.
    Event {
        #[command(subcommand)]
        command: commands::event::EventCommands,
    },
    /// Show the shared cross-session focus pointer.
    Global {
        /// Print the raw JSON record.
        #[arg(long)]
        json: bool,
    },
    /// Session bookkeeping.
    Session {
        #[command(subcommand)]
        command: commands::session::SessionCommands,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so hook consumers can parse stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let config = FocusConfig::resolve(cli.home.as_deref())?;
    let ctx = FocusContext {
        session_id: resolve_session_id(cli.session.as_deref()),
        config,
    };
    tracing::debug!(session = %ctx.session_id, home = %ctx.config.home.display(), "focus starting");

    match &cli.command {
        Commands::Goal { command } => commands::goal::execute(command, &ctx),
        Commands::Event { command } => commands::event::execute(command, &ctx),
        Commands::Global { json } => commands::global::execute(&ctx, *json),
        Commands::Session { command } => commands::session::execute(command, &ctx),
    }
}
