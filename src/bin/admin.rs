//! CLI administration tool for link-resolver.
//!
//! Manages links directly in the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a link ("" is the key served at `/`)
//! cargo run --bin admin -- link create docs https://docs.example.com/
//!
//! # Change or remove it
//! cargo run --bin admin -- link update docs https://docs.example.com/v2/
//! cargo run --bin admin -- link delete docs
//!
//! # Inspect
//! cargo run --bin admin -- link show docs
//! cargo run --bin admin -- link resolve docs
//!
//! # Database
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see `link_resolver::config`.
//!
//! # Caching
//!
//! The CLI runs with caching disabled. A running server keeps serving its
//! cached destination for a changed key until that record expires.

use link_resolver::api::dto::link::{CreateLinkRequest, UpdateLinkRequest};
use link_resolver::application::services::CacheAsideStore;
use link_resolver::config;
use link_resolver::infrastructure::cache::NullCache;
use link_resolver::infrastructure::persistence::{self, SqliteLinkRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

type AdminStore = CacheAsideStore<SqliteLinkRepository>;

/// CLI tool for managing link-resolver.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a new link
    Create {
        /// Short key (use "" for the root path)
        key: String,
        /// Destination URL
        destination: String,
    },

    /// Change the destination of a link
    Update {
        key: String,
        destination: String,
    },

    /// Delete a link
    Delete {
        key: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show the stored entry for a key
    Show { key: String },

    /// Resolve a key the way a redirect would
    Resolve { key: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Create the schema if it does not exist
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let pool = persistence::connect(
        &config.database_url,
        config.db_max_connections,
        Duration::from_secs(config.db_connect_timeout),
    )
    .await
    .context("Failed to connect to database")?;

    match cli.command {
        Commands::Link { action } => {
            let store = CacheAsideStore::new(
                Arc::new(SqliteLinkRepository::new(Arc::new(pool.clone()))),
                Arc::new(NullCache::new()),
                config.resolver_settings(),
            );
            handle_link_action(action, &store).await?
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    pool.close().await;
    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, store: &AdminStore) -> Result<()> {
    match action {
        LinkAction::Create { key, destination } => {
            CreateLinkRequest {
                key: key.clone(),
                destination: destination.clone(),
            }
            .validate()
            .context("Invalid link")?;

            store
                .create_link(&key, &destination)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

            println!("{}", "✅ Link created".green().bold());
            print_mapping(&key, &destination);
        }
        LinkAction::Update { key, destination } => {
            UpdateLinkRequest {
                destination: destination.clone(),
            }
            .validate()
            .context("Invalid destination")?;

            store
                .update_link(&key, &destination)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to update link: {}", e))?;

            println!("{}", "✅ Link updated".green().bold());
            print_mapping(&key, &destination);
        }
        LinkAction::Delete { key, yes } => delete_link(store, key, yes).await?,
        LinkAction::Show { key } => show_link(store, key).await?,
        LinkAction::Resolve { key } => {
            let destination = store
                .resolve(&key)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to resolve link: {}", e))?;

            if destination == store.settings().fallback_destination {
                println!("{}", "⚠️  Key resolves to the fallback destination".yellow());
            }
            print_mapping(&key, &destination);
        }
    }

    Ok(())
}

/// Deletes a link after showing it and asking for confirmation.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes` is passed
/// - The key becomes available for a new link immediately
async fn delete_link(store: &AdminStore, key: String, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Link".bright_blue().bold());
    println!();

    let link = store
        .find_link(&key)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Link not found")?;

    print_mapping(&link.key, &link.destination);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    store
        .delete_link(&key)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!("{}", "✅ Link deleted".green().bold());
    Ok(())
}

/// Prints the stored entry for a key.
///
/// # Output Format
///
/// ```text
///   Key:         docs
///   Destination: https://docs.example.com/
///   Hits:        0
///   Created:     2024-01-15 10:30
/// ```
async fn show_link(store: &AdminStore, key: String) -> Result<()> {
    let link = store
        .find_link(&key)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let Some(link) = link else {
        println!("{}", "  No link stored for this key".yellow());
        return Ok(());
    };

    print_mapping(&link.key, &link.destination);
    println!("  Hits:        {}", link.hits.to_string().bright_black());
    println!(
        "  Created:     {}",
        link.created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );

    Ok(())
}

fn print_mapping(key: &str, destination: &str) {
    let shown_key = if key.is_empty() { "(root)" } else { key };
    println!("  Key:         {}", shown_key.cyan());
    println!("  Destination: {}", destination.bright_yellow());
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &SqlitePool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shortlinks")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!(
                "  Links: {}",
                links_count.to_string().bright_green().bold()
            );
        }
        DbAction::Migrate => {
            persistence::run_migrations(pool).await?;
            println!("{}", "✅ Schema is up to date".green().bold());
        }
    }

    Ok(())
}
