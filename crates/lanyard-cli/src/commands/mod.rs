//! Command implementations.

pub mod account;
pub mod data;
pub mod whoami;

use anyhow::{Context, Result};
use colored::Colorize;

use lanyard::{ApiClient, BaseUrl, ClientConfig, Credentials};

use crate::cli::Cli;
use crate::output;

/// Build a client and authenticate.
///
/// Access tokens are never persisted, so every invocation performs a fresh
/// login; the refresh credential lives only in this process's cookie jar.
pub async fn connect(cli: &Cli) -> Result<ApiClient> {
    let base_url = BaseUrl::new(&cli.base_url).context("Invalid base URL")?;
    let client = ApiClient::new(&ClientConfig::new(base_url))?;

    let username = cli
        .username
        .as_deref()
        .context("Missing username. Pass --username or set LANYARD_USERNAME.")?;
    let password = cli
        .password
        .as_deref()
        .context("Missing password. Pass --password or set LANYARD_PASSWORD.")?;

    eprintln!("{}", "Logging in...".dimmed());
    client
        .login(&Credentials::new(username, password))
        .await
        .context("Failed to login")?;

    Ok(client)
}

/// Invalidate the refresh credential and clear the in-memory session.
pub async fn logout(client: &ApiClient) -> Result<()> {
    client.logout().await.context("Failed to logout")?;
    output::success("Logged out");
    Ok(())
}
