//! Download every URL with live progress rows.

use aioget_core::config::AiogetConfig;
use aioget_core::http::CurlOpener;
use aioget_core::humansize::Units;
use aioget_core::progress::RowLayout;
use aioget_core::scheduler::Scheduler;
use aioget_core::sink::DirSinkOpener;
use anyhow::{Context, Result};
use std::sync::Arc;

use crate::cli::input::collect_urls;
use crate::cli::terminal::{summary_line, TerminalProgress};
use crate::cli::Cli;

pub async fn run_download(cli: Cli, cfg: &AiogetConfig) -> Result<()> {
    let urls = collect_urls(&cli.urls, cli.from_file.as_deref())?;
    if urls.is_empty() {
        println!("No URLs given.");
        return Ok(());
    }

    let limit = cli.jobs.unwrap_or(cfg.concurrency_limit);
    let units = if cli.decimal { Units::Decimal } else { cfg.units() };
    let output_dir = match cli.output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("current directory")?,
    };

    let layout = RowLayout::from_urls(&urls);
    let progress = Arc::new(TerminalProgress::new(layout, units));
    progress.prepare().context("terminal setup")?;

    let scheduler = Scheduler::new(
        CurlOpener::new(cfg.curl_options()),
        DirSinkOpener::new(&output_dir),
        progress.clone(),
    )
    .with_settings(cfg.transfer_settings());

    let results = match scheduler.run_all(&urls, limit).await {
        Ok(results) => results,
        Err(e) => {
            // Bring the cursor back before reporting.
            let _ = progress.finish("aborted");
            return Err(e.into());
        }
    };

    progress
        .finish(&summary_line(&results))
        .context("terminal teardown")?;
    tracing::info!(dir = %output_dir.display(), "run finished");
    Ok(())
}
