use anyhow::Result;
use archivist::{get_config, AppConfig, ImagePipeline, RunSummary};
use clap::{Args, Parser};
use std::path::{Path, PathBuf};
use tracing::info;

/// Settings that override the loaded configuration for one invocation.
#[derive(Args, Debug)]
pub struct Overrides {
    /// The directory that receives JSON records and pipeline.log
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// The captioning model to use
    #[arg(long)]
    caption_model: Option<String>,
    /// The embedding model to use
    #[arg(long)]
    embedding_model: Option<String>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// The directory scanned for images (not recursive)
    #[arg(long)]
    input_dir: Option<PathBuf>,
    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Parser, Debug)]
pub struct DescribeArgs {
    /// The image files to caption
    #[arg(required = true)]
    images: Vec<PathBuf>,
    #[command(flatten)]
    overrides: Overrides,
}

fn load_config(config_path: Option<&Path>, overrides: &Overrides) -> Result<AppConfig> {
    let mut config = get_config(config_path)?;
    if let Some(dir) = &overrides.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(model) = &overrides.caption_model {
        config.caption_model = model.clone();
    }
    if let Some(model) = &overrides.embedding_model {
        config.embedding_model = model.clone();
    }
    info!("Loaded configuration: {config:?}");
    Ok(config)
}

fn print_summary(summary: &RunSummary, output_dir: &Path) {
    println!(
        "✅ Finished {} image(s): {} completed, {} failed. Results in '{}'.",
        summary.discovered,
        summary.completed,
        summary.failed,
        output_dir.display()
    );
    for path in &summary.write_failures {
        eprintln!("❌ Could not save results for '{}'", path.display());
    }
}

pub async fn handle_run(config_path: Option<&Path>, args: &RunArgs) -> Result<()> {
    let mut config = load_config(config_path, &args.overrides)?;
    if let Some(dir) = &args.input_dir {
        config.input_dir = dir.clone();
    }

    let pipeline = ImagePipeline::from_config(&config)?;
    println!("🔎 Scanning '{}' for JPG images...", config.input_dir.display());
    let summary = pipeline.run(&config.input_dir).await?;

    if summary.discovered == 0 {
        println!(
            "⚠️ No JPG images found in '{}' directory.",
            config.input_dir.display()
        );
        return Ok(());
    }

    print_summary(&summary, &config.output_dir);
    Ok(())
}

pub async fn handle_describe(config_path: Option<&Path>, args: &DescribeArgs) -> Result<()> {
    let config = load_config(config_path, &args.overrides)?;
    let pipeline = ImagePipeline::from_config(&config)?;

    println!("🔎 Processing {} image(s)...", args.images.len());
    let summary = pipeline.run_images(&args.images).await?;

    print_summary(&summary, &config.output_dir);
    Ok(())
}
