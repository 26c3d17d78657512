//! URL list from positional arguments or a file.

use anyhow::{Context, Result};
use std::path::Path;

/// Returns the URLs to download. With `from_file`, every line of the file
/// (trimmed) is one URL and positional arguments are ignored. Blank lines are
/// kept; they fail as individual transfers.
pub fn collect_urls(args: &[String], from_file: Option<&Path>) -> Result<Vec<String>> {
    let Some(path) = from_file else {
        return Ok(args.to_vec());
    };
    if !args.is_empty() {
        tracing::warn!("ignoring {} positional URL(s); reading {}", args.len(), path.display());
    }
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read URL list: {}", path.display()))?;
    Ok(data.lines().map(|line| line.trim().to_string()).collect())
}
