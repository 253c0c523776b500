//! PageDigest command-line front end
//!
//! # Usage
//!
//! ```bash
//! # Render markdown to blocks (no remote calls)
//! pagedigest render --input summary.md
//!
//! # Publish into the "Summary" section of a page
//! pagedigest publish --page-id <PAGE_ID> --input summary.md
//!
//! # Publish minutes into the page whose unique id is 1201
//! pagedigest publish --uid 1201 --section minutes --input minutes.md
//!
//! # Same, against an in-memory tree
//! pagedigest publish --uid 1201 --dry-run < summary.md
//! ```
//!
//! # Environment Variables
//!
//! Settings are read by `DigestConfig::from_env` (`NOTION_API_KEY`,
//! `NOTION_DATABASE_ID`, `MAX_BLOCK_CHARS`, ...). `RUST_LOG` controls log
//! verbosity. Logs go to stderr; stdout only ever carries JSON.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pagedigest_core::{
    markdown_to_blocks, ContainerKind, DigestConfig, InMemoryTreeStore, NotionStore,
    PublishReport, SectionKind, SummaryPublisher, SyncError,
};
use serde_json::json;
use tokio::io::AsyncReadExt;

#[derive(Parser)]
#[command(
    name = "pagedigest",
    version,
    about = "Render generated markdown into labeled page sections"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render markdown to blocks and print them as JSON
    Render(RenderArgs),

    /// Replace the body of a page section with rendered markdown
    Publish(PublishArgs),

    /// Report which settings are present
    Health,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Markdown file (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Override MAX_BLOCK_CHARS
    #[arg(long)]
    max_chars: Option<usize>,
}

#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct Target {
    /// Page (root block) id
    #[arg(long)]
    page_id: Option<String>,

    /// Database unique id, e.g. 1201 or DOC-1201
    #[arg(long)]
    uid: Option<String>,
}

#[derive(clap::Args)]
struct PublishArgs {
    #[command(flatten)]
    target: Target,

    /// Which configured section label to use
    #[arg(long, default_value = "summary")]
    section: SectionKind,

    /// Literal section label, overriding --section
    #[arg(long)]
    label: Option<String>,

    /// Container block grouping the sections
    #[arg(long, default_value = "callout")]
    container: ContainerKind,

    /// Markdown file (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Publish into an in-memory tree instead of the remote API
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DigestConfig::from_env()?;

    match cli.command {
        Command::Render(args) => render(&config, args).await,
        Command::Publish(args) => publish(&config, args).await,
        Command::Health => health(&config),
    }
}

async fn render(config: &DigestConfig, args: RenderArgs) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(max_chars) = args.max_chars {
        config.max_chunk_len = max_chars;
        config.validate().map_err(SyncError::configuration)?;
    }

    let markdown = read_input(args.input.as_deref()).await?;
    let blocks = markdown_to_blocks(&markdown, config.max_chunk_len);
    tracing::info!("Rendered {} blocks", blocks.len());

    println!("{}", serde_json::to_string_pretty(&blocks)?);
    Ok(())
}

async fn publish(config: &DigestConfig, args: PublishArgs) -> anyhow::Result<()> {
    let markdown = read_input(args.input.as_deref()).await?;
    let label = args
        .label
        .clone()
        .unwrap_or_else(|| args.section.default_label(config).to_string());
    check_target(args.target.page_id.as_deref(), &label)?;
    let unique_id = args.target.uid.as_deref().map(parse_unique_id).transpose()?;

    let report = if args.dry_run {
        publish_dry_run(config, &args, unique_id, &label, &markdown).await?
    } else {
        publish_remote(config, &args, unique_id, &label, &markdown).await?
    };

    if report.reconcile.delete_failures() > 0 {
        tracing::warn!(
            "{} previous blocks could not be deleted from section '{}'",
            report.reconcile.delete_failures(),
            label
        );
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn publish_remote(
    config: &DigestConfig,
    args: &PublishArgs,
    unique_id: Option<u64>,
    label: &str,
    markdown: &str,
) -> anyhow::Result<PublishReport> {
    let store = Arc::new(NotionStore::new(config)?);
    let publisher = SummaryPublisher::from_config(store.clone(), config);

    let report = match (unique_id, &args.target.page_id) {
        (Some(unique_id), _) => {
            config.require_database()?;
            publisher
                .publish_for_unique_id(&*store, unique_id, args.container, label, markdown)
                .await?
        }
        (None, Some(page_id)) => {
            publisher
                .publish(page_id, args.container, label, markdown)
                .await?
        }
        (None, None) => anyhow::bail!("either --page-id or --uid is required"),
    };
    Ok(report)
}

async fn publish_dry_run(
    config: &DigestConfig,
    args: &PublishArgs,
    unique_id: Option<u64>,
    label: &str,
    markdown: &str,
) -> anyhow::Result<PublishReport> {
    let store = InMemoryTreeStore::new();
    let publisher = SummaryPublisher::from_config(Arc::new(store.clone()), config);
    tracing::info!("Dry run: publishing into an in-memory tree");

    let report = match (unique_id, &args.target.page_id) {
        (Some(unique_id), _) => {
            store.register_page(unique_id, &format!("dry-run-page-{}", unique_id));
            publisher
                .publish_for_unique_id(&store, unique_id, args.container, label, markdown)
                .await?
        }
        (None, Some(page_id)) => {
            store.add_root(page_id);
            publisher
                .publish(page_id, args.container, label, markdown)
                .await?
        }
        (None, None) => anyhow::bail!("either --page-id or --uid is required"),
    };
    Ok(report)
}

fn health(config: &DigestConfig) -> anyhow::Result<()> {
    let remote = config.require_remote();
    let database = config.require_database();

    let status = json!({
        "status": if remote.is_ok() { "ok" } else { "incomplete" },
        "notion_api_key_set": !config.notion_api_key.is_empty(),
        "database_id_set": !config.database_id.is_empty(),
        "unique_id_lookup": database.is_ok(),
        "notion_api_version": config.notion_api_version,
        "notion_base_url": config.notion_base_url,
        "summary_label": config.summary_label,
        "minutes_label": config.minutes_label,
        "max_chunk_len": config.max_chunk_len,
    });
    println!("{}", serde_json::to_string_pretty(&status)?);

    remote?;
    Ok(())
}

/// Reject targets that could only ever address nothing
fn check_target(page_id: Option<&str>, label: &str) -> Result<(), SyncError> {
    if page_id.is_some_and(|id| id.trim().is_empty()) {
        return Err(SyncError::invalid_input("--page-id cannot be empty"));
    }
    if label.is_empty() {
        return Err(SyncError::invalid_input("section label cannot be empty"));
    }
    Ok(())
}

/// Accepts a bare number or a prefixed form such as `DOC-1201`
fn parse_unique_id(raw: &str) -> Result<u64, SyncError> {
    let digits = raw.trim().rsplit('-').next().unwrap_or_default();
    digits
        .parse::<u64>()
        .map_err(|_| SyncError::invalid_input(format!("unique id must be numeric, got '{}'", raw)))
}

async fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read markdown from stdin")?;
            Ok(buffer)
        }
    }
}
