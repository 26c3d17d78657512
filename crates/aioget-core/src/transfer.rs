//! One URL's fetch-and-write loop.
//!
//! A [`Transfer`] resolves its destination name up front, opens the stream,
//! then repeats read chunk → write chunk → sample estimator → emit event
//! until the stream is exhausted or something fails.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::TransferError;
use crate::estimator::{RateEstimator, RateSample, DEFAULT_ETA_WINDOW, DEFAULT_SAMPLE_INTERVAL};
use crate::http::{ChunkStream, StreamOpener};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::sink::{ChunkSink, SinkOpener};
use crate::url_model::destination_name;

/// Bytes requested from the stream per loop iteration.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Lifecycle of a transfer. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// Loop parameters shared by all transfers of a run.
#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub chunk_size: usize,
    pub sample_interval: Duration,
    pub eta_window: usize,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            eta_window: DEFAULT_ETA_WINDOW,
        }
    }
}

/// Final report for one URL.
#[derive(Debug)]
pub struct TransferResult {
    pub url: String,
    pub destination_name: String,
    pub state: TransferState,
    pub total_size: Option<u64>,
    pub bytes_transferred: u64,
    /// Set iff `state == Failed`.
    pub error: Option<TransferError>,
}

impl TransferResult {
    pub fn is_completed(&self) -> bool {
        self.state == TransferState::Completed
    }
}

/// `floor(bytes * 100 / total)`, or `None` when the total is unknown or zero.
pub fn percent_of(bytes: u64, total: Option<u64>) -> Option<u64> {
    match total {
        Some(total) if total > 0 => Some((u128::from(bytes) * 100 / u128::from(total)) as u64),
        _ => None,
    }
}

/// Download state for one URL, owned by the task that runs it.
#[derive(Debug)]
pub struct Transfer {
    url: String,
    destination_name: Arc<str>,
    total_size: Option<u64>,
    bytes_transferred: u64,
    state: TransferState,
}

impl Transfer {
    /// A pending transfer; the destination name is derived here, before any I/O.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let destination_name = Arc::from(destination_name(&url));
        Self {
            url,
            destination_name,
            total_size: None,
            bytes_transferred: 0,
            state: TransferState::Pending,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn destination_name(&self) -> &str {
        &self.destination_name
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    /// Runs to a terminal state. Errors end up in the result, never in a panic
    /// or an early return, so one failing URL cannot disturb the others.
    pub async fn run<O, S>(
        mut self,
        opener: &O,
        sinks: &S,
        progress: &dyn ProgressSink,
        settings: &TransferSettings,
    ) -> TransferResult
    where
        O: StreamOpener,
        S: SinkOpener,
    {
        self.state = TransferState::InProgress;
        tracing::debug!(url = %self.url, name = %self.destination_name, "transfer started");

        let error = match self.drive(opener, sinks, progress, settings).await {
            Ok(()) => {
                self.state = TransferState::Completed;
                tracing::info!(
                    name = %self.destination_name,
                    bytes = self.bytes_transferred,
                    "transfer completed"
                );
                None
            }
            Err(e) => {
                self.state = TransferState::Failed;
                tracing::warn!(
                    url = %self.url,
                    bytes = self.bytes_transferred,
                    error = %e,
                    "transfer failed"
                );
                Some(e)
            }
        };

        TransferResult {
            url: self.url,
            destination_name: self.destination_name.to_string(),
            state: self.state,
            total_size: self.total_size,
            bytes_transferred: self.bytes_transferred,
            error,
        }
    }

    async fn drive<O, S>(
        &mut self,
        opener: &O,
        sinks: &S,
        progress: &dyn ProgressSink,
        settings: &TransferSettings,
    ) -> Result<(), TransferError>
    where
        O: StreamOpener,
        S: SinkOpener,
    {
        let mut stream = opener.open(&self.url).await?;
        self.total_size = stream.content_length();
        if self.total_size.is_none() {
            tracing::debug!(url = %self.url, "no usable Content-Length; size unknown");
        }

        let mut sink = sinks.create(&self.destination_name).await?;
        let mut estimator = RateEstimator::with_params(
            Instant::now(),
            self.total_size,
            settings.sample_interval,
            settings.eta_window,
        );

        loop {
            let chunk = stream.read_chunk(settings.chunk_size).await?;
            if chunk.is_empty() {
                break;
            }
            sink.write_chunk(&chunk).await?;
            self.bytes_transferred += chunk.len() as u64;
            let sample = estimator.sample(Instant::now(), self.bytes_transferred);
            progress.on_progress(&self.event(sample));
        }

        sink.finish().await
    }

    fn event(&self, sample: RateSample) -> ProgressEvent {
        ProgressEvent {
            destination_name: Arc::clone(&self.destination_name),
            percent: percent_of(self.bytes_transferred, self.total_size),
            bytes_transferred: self.bytes_transferred,
            total_size: self.total_size,
            current_rate: sample.rate,
            eta: sample.eta,
        }
    }
}
