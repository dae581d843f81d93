//! lagoon-sync: render the commands that sync a resource between environments.
//!
//! # Usage
//!
//! ```text
//! lagoon-sync sync <type> [--config .lagoon.yml] [--json]
//! lagoon-sync sync --all [--config .lagoon.yml] [--json]
//! lagoon-sync list [--json]
//! ```
//!
//! Nothing is executed: the remote command, local command and transfer
//! resource are printed for whatever runs them.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{list::ListArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "lagoon-sync",
    version,
    about = "Generate commands that sync resources between a remote and a local environment",
    long_about = None,
)]
struct Cli {
    /// Log resolution details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the remote command, local command and transfer resource for a resource type.
    Sync(SyncArgs),

    /// List the resource types this build can sync.
    List(ListArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::List(args) => args.run(),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
