use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::http::CurlOptions;
use crate::humansize::Units;
use crate::scheduler::DEFAULT_CONCURRENCY_LIMIT;
use crate::transfer::{TransferSettings, DEFAULT_CHUNK_SIZE};

/// Global configuration loaded from `~/.config/aioget/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiogetConfig {
    /// Maximum transfers running at once.
    pub concurrency_limit: usize,
    /// Bytes read from the network per loop iteration.
    pub chunk_size: usize,
    /// Minimum time between two throughput samples, in milliseconds.
    pub sample_interval_ms: u64,
    /// Number of throughput samples averaged into one ETA.
    pub eta_window: usize,
    /// Sizes in KiB/MiB (true) or KB/MB (false).
    pub binary_units: bool,
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Optional per-transfer bandwidth cap in bytes per second (None = no cap).
    #[serde(default)]
    pub max_bytes_per_sec: Option<u64>,
}

impl Default for AiogetConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            sample_interval_ms: 500,
            eta_window: 3,
            binary_units: true,
            connect_timeout_secs: 30,
            max_bytes_per_sec: None,
        }
    }
}

impl AiogetConfig {
    pub fn transfer_settings(&self) -> TransferSettings {
        TransferSettings {
            chunk_size: self.chunk_size.max(1),
            sample_interval: Duration::from_millis(self.sample_interval_ms),
            eta_window: self.eta_window.max(1),
        }
    }

    pub fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            buffer_size: self.chunk_size.max(1),
            max_recv_speed: self.max_bytes_per_sec,
            ..CurlOptions::default()
        }
    }

    pub fn units(&self) -> Units {
        Units::from_binary_flag(self.binary_units)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("aioget")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AiogetConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AiogetConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: AiogetConfig = toml::from_str(&data)?;
    Ok(cfg)
}
