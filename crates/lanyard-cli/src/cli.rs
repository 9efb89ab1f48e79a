//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::account::AccountCommand;
use crate::commands::data::DataCommand;
use crate::commands::whoami::WhoamiArgs;

/// Admin API CLI.
#[derive(Parser, Debug)]
#[command(name = "lanyard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API base URL
    #[arg(long, env = "LANYARD_BASE_URL", default_value = "http://localhost:3000", global = true)]
    pub base_url: String,

    /// Username to authenticate with
    #[arg(long, env = "LANYARD_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password to authenticate with
    #[arg(long, env = "LANYARD_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display the authenticated user
    Whoami(WhoamiArgs),

    /// Account operations
    Account(AccountCommand),

    /// Collection-data operations
    Data(DataCommand),

    /// Invalidate the refresh credential server-side
    Logout,
}
