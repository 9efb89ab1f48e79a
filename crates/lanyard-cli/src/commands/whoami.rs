//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use lanyard::ApiClient;

use crate::output;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the full user record as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(client: &ApiClient, args: &WhoamiArgs) -> Result<()> {
    let user = client
        .current_user()
        .await
        .context("No authenticated user")?;

    if args.json {
        output::json_pretty(&user)?;
        return Ok(());
    }

    output::field("Username", &user.username);
    output::field("Name", &user.name);
    output::field("Role", &user.role.to_string());
    output::field("Id", user.id.as_str());
    if let Some(description) = &user.description {
        output::field("Description", description);
    }

    Ok(())
}
