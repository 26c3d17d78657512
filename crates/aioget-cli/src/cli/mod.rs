//! CLI for aioget.

mod commands;
mod input;
mod terminal;

use aioget_core::config::{self, AiogetConfig};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use commands::run_download;

/// Downloads a list of files concurrently, one live progress line per file.
#[derive(Debug, Parser)]
#[command(name = "aioget", version)]
#[command(about = "Downloads concurrently a list of files", long_about = None)]
pub struct Cli {
    /// Download links.
    pub urls: Vec<String>,

    /// Read URLs from a file, one per line (replaces positional URLs).
    #[arg(short = 'f', long = "from-file", alias = "from_file", value_name = "FILE")]
    pub from_file: Option<PathBuf>,

    /// Run up to N transfers at once (default from config, normally 4).
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Directory to save files into (default: current directory).
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Show sizes in KB/MB (powers of 1000) instead of KiB/MiB.
    #[arg(long)]
    pub decimal: bool,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match config::load_or_init() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("config unavailable ({:#}); using defaults", e);
                AiogetConfig::default()
            }
        };
        tracing::debug!("loaded config: {:?}", cfg);
        run_download(cli, &cfg).await
    }
}

#[cfg(test)]
mod tests;
