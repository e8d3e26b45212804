use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::{error, info};
use tso_core::diff::DiffOptions;
use tso_core::RunConfig;
use tso_models::TsoConfig;

#[derive(Args, Debug)]
pub struct Command {
    /// Normalize only this file; its name decides the normalizer
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Directory to normalize (default: current directory)
    #[arg(long = "target", short = 't')]
    pub target_path: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Print diffs instead of writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Disable colored diff output
    #[arg(long)]
    pub no_color: bool,
}

/// Run a normalization pass. Returns whether every file succeeded.
pub async fn handler(args: &Command) -> Result<bool> {
    let target_path = match &args.target_path {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to resolve the current directory")?,
    };

    let config = match &args.config {
        Some(path) => TsoConfig::load(path)?,
        None => TsoConfig::default(),
    };

    let run = RunConfig {
        target_path,
        file: args.file.clone(),
        dry_run: args.dry_run,
        config,
        diff: DiffOptions::with_color_control(args.no_color),
    };

    let report = run.execute().await?;

    for diff in &report.diffs {
        diff.print();
    }
    for failure in &report.errors {
        error!("{failure}");
    }
    info!("{}", report.stats);

    Ok(report.is_success())
}
