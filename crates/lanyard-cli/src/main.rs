//! lanyard - CLI for the admin API.
//!
//! This is a thin wrapper over the `lanyard` library, intended for manual
//! administration and debugging against an admin backend. Access tokens are
//! held only in process memory, so every invocation authenticates fresh.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    let client = commands::connect(&cli).await?;

    match &cli.command {
        Commands::Whoami(args) => commands::whoami::run(&client, args).await,
        Commands::Account(cmd) => commands::account::handle(&client, cmd).await,
        Commands::Data(cmd) => commands::data::handle(&client, cmd).await,
        Commands::Logout => commands::logout(&client).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
}
