//! PartBook: spare part catalog import tooling
//!
//! Previews and commits bulk spreadsheet uploads against the service
//! catalog, and emits the blank template operators fill in.

mod cli;
mod config;
mod import;
mod storage;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "partbook", about = "Spare part workbook import and preview", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dry-run a workbook: validation and create-vs-update classification
    Preview {
        /// Path to the .xlsx workbook
        file: PathBuf,
    },
    /// Commit a workbook: persist images and upsert spare parts
    Commit {
        /// Path to the .xlsx workbook
        file: PathBuf,
    },
    /// Write a blank import template workbook
    Template {
        /// Output path
        #[arg(default_value = "spare-parts-template.xlsx")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Preview { file } => cli::commands::import::handle_preview(&file).await,
        Commands::Commit { file } => cli::commands::import::handle_commit(&file).await,
        Commands::Template { out } => cli::commands::import::handle_template(&out),
    }
}
