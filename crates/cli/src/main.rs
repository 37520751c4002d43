//! # archivist: batch captioning for archival images
//!
//! This is the main entry point for the `archivist` command-line interface.

mod process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use process::{DescribeArgs, RunArgs};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a YAML configuration file (defaults to ./archivist.yml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Caption every .jpg/.JPG image in the input directory
    Run(RunArgs),
    /// Caption the given image files
    Describe(DescribeArgs),
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => process::handle_run(cli.config.as_deref(), args).await,
        Commands::Describe(args) => process::handle_describe(cli.config.as_deref(), args).await,
    };

    if let Err(e) = &result {
        eprintln!("❌ Run failed: {e}");
    }
    result
}
