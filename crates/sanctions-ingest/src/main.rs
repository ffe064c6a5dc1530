//! Sanctions Ingest - store maintenance and export tool
//!
//! Ingestion itself happens through source-specific scrapers that link the
//! library; this binary covers the operational pieces: wiping the schema
//! and re-running the CSV export/upload step over whatever the store
//! currently holds.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sanctions_common::logging::{init_logging, LogConfig, LogLevel};
use sanctions_ingest::{archive::Archive, config::Config, db::Store, export};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sanctions-ingest")]
#[command(author, version, about = "Sanctions data store maintenance tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drop and recreate the store schema
    Reset,

    /// Export all record kinds to CSV and upload them
    Export {
        /// Source name used in archive keys
        #[arg(short, long)]
        source: String,

        /// Run date stamp; defaults to today (UTC)
        #[arg(short, long)]
        run: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env()?;
    if cli.verbose {
        log_config = log_config.with_level(LogLevel::Debug);
    }
    init_logging(&log_config)?;

    let config = Config::load()?;
    let store = Store::connect(&config.database).await?;

    // Close the pool whether the command succeeded or not.
    let result = run_command(cli.command, &config, &store).await;
    store.close().await;
    result
}

async fn run_command(command: Command, config: &Config, store: &Store) -> Result<()> {
    match command {
        Command::Reset => {
            store.reset_schema().await?;
            info!("Store schema reset");
        }
        Command::Export { source, run } => {
            let run = run.unwrap_or_else(|| chrono::Utc::now().date_naive().to_string());
            let archive = Archive::from_config(&config.storage);
            let produced =
                export::export_all(store, &config.export.dir, archive.as_ref(), &source, &run)
                    .await?;
            info!(files = produced.len(), "Export complete");
        }
    }
    Ok(())
}
