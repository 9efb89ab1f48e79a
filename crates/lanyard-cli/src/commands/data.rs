//! Collection-data subcommand implementations.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use lanyard::ApiClient;
use lanyard_contract::{CreateCollectionDataRequest, FindQuery, ObjectId};

use crate::output;

#[derive(Args, Debug)]
pub struct DataCommand {
    #[command(subcommand)]
    pub command: DataSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum DataSubcommand {
    /// List collection-data entries
    List(ListArgs),

    /// Fetch a single entry
    Get(GetArgs),

    /// Create a new entry
    Create(CreateArgs),

    /// Remove an entry
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Number of entries to skip
    #[arg(long)]
    pub skip: Option<u64>,

    /// Maximum number of entries to return
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
    /// Entry id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Entry name
    #[arg(long)]
    pub name: String,

    /// Optional description
    #[arg(long)]
    pub description: Option<String>,

    /// Optional remark
    #[arg(long)]
    pub remark: Option<String>,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Entry id
    pub id: String,
}

pub async fn handle(client: &ApiClient, cmd: &DataCommand) -> Result<()> {
    match &cmd.command {
        DataSubcommand::List(args) => list(client, args).await,
        DataSubcommand::Get(args) => get(client, args).await,
        DataSubcommand::Create(args) => create(client, args).await,
        DataSubcommand::Remove(args) => remove(client, args).await,
    }
}

async fn list(client: &ApiClient, args: &ListArgs) -> Result<()> {
    let query = FindQuery {
        skip: args.skip,
        limit: args.limit,
        keyword: args.keyword.clone(),
    };

    let page = client
        .find_collection_data(&query)
        .await
        .context("Failed to list collection-data")?;

    if page.data.is_empty() {
        eprintln!("{}", "No entries found.".dimmed());
        return Ok(());
    }

    for entry in &page.data {
        if args.pretty {
            output::json_pretty(entry)?;
        } else {
            output::json(entry)?;
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
    let id = ObjectId::new(&args.id).context("Invalid entry id")?;
    let entry = client
        .get_collection_data(&id)
        .await
        .context("Failed to fetch entry")?;

    output::json_pretty(&entry)
}

async fn create(client: &ApiClient, args: &CreateArgs) -> Result<()> {
    let request = CreateCollectionDataRequest {
        name: &args.name,
        description: args.description.as_deref(),
        remark: args.remark.as_deref(),
    };

    let entry = client
        .create_collection_data(&request)
        .await
        .context("Failed to create entry")?;

    output::success("Entry created");
    output::field("Id", entry.id.as_str());
    Ok(())
}

async fn remove(client: &ApiClient, args: &RemoveArgs) -> Result<()> {
    let id = ObjectId::new(&args.id).context("Invalid entry id")?;
    client
        .remove_collection_data(&id)
        .await
        .context("Failed to remove entry")?;

    output::success("Entry removed");
    Ok(())
}
