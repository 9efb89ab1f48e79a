//! Account subcommand implementations.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use lanyard::ApiClient;
use lanyard_contract::{CreateAccountRequest, FindQuery, ObjectId};

use crate::output;

#[derive(Args, Debug)]
pub struct AccountCommand {
    #[command(subcommand)]
    pub command: AccountSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AccountSubcommand {
    /// List accounts
    List(ListArgs),

    /// Fetch a single account
    Get(GetArgs),

    /// Create a new account
    Create(CreateArgs),

    /// Remove an account
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Number of accounts to skip
    #[arg(long)]
    pub skip: Option<u64>,

    /// Maximum number of accounts to return
    #[arg(long)]
    pub limit: Option<u64>,

    /// Filter by keyword
    #[arg(long)]
    pub keyword: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Account id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Username for the new account
    #[arg(long)]
    pub username: String,

    /// Password for the new account
    #[arg(long)]
    pub password: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    /// Optional description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Account id
    pub id: String,
}

pub async fn handle(client: &ApiClient, cmd: &AccountCommand) -> Result<()> {
    match &cmd.command {
        AccountSubcommand::List(args) => list(client, args).await,
        AccountSubcommand::Get(args) => get(client, args).await,
        AccountSubcommand::Create(args) => create(client, args).await,
        AccountSubcommand::Remove(args) => remove(client, args).await,
    }
}

async fn list(client: &ApiClient, args: &ListArgs) -> Result<()> {
    let query = FindQuery {
        skip: args.skip,
        limit: args.limit,
        keyword: args.keyword.clone(),
    };

    let page = client
        .find_accounts(&query)
        .await
        .context("Failed to list accounts")?;

    if page.data.is_empty() {
        eprintln!("{}", "No accounts found.".dimmed());
        return Ok(());
    }

    for account in &page.data {
        if args.pretty {
            output::json_pretty(account)?;
        } else {
            output::json(account)?;
        }
    }

    eprintln!();
    eprintln!(
        "{}: {} of {}",
        "Shown".dimmed(),
        page.data.len(),
        page.total
    );

    Ok(())
}

async fn get(client: &ApiClient, args: &GetArgs) -> Result<()> {
    let id = ObjectId::new(&args.id).context("Invalid account id")?;
    let account = client
        .get_account(&id)
        .await
        .context("Failed to fetch account")?;

    output::json_pretty(&account)
}

async fn create(client: &ApiClient, args: &CreateArgs) -> Result<()> {
    let request = CreateAccountRequest {
        username: &args.username,
        password: &args.password,
        name: &args.name,
        description: args.description.as_deref(),
    };

    let created = client
        .create_account(&request)
        .await
        .context("Failed to create account")?;

    output::success("Account created");
    output::field("Id", &created.id);
    Ok(())
}

async fn remove(client: &ApiClient, args: &RemoveArgs) -> Result<()> {
    let id = ObjectId::new(&args.id).context("Invalid account id")?;
    client
        .remove_account(&id)
        .await
        .context("Failed to remove account")?;

    output::success("Account removed");
    Ok(())
}
