//! Progress events and the sink that renders them.
//!
//! Transfers emit one [`ProgressEvent`] per written chunk. Rendering is up to
//! the [`ProgressSink`]; this module also provides the pure pieces a terminal
//! sink needs: the [`RowLayout`] and line formatting.

mod layout;
mod line;

use std::sync::Arc;
use std::time::Duration;

use crate::transfer::TransferResult;

pub use layout::RowLayout;
pub use line::{render_failed_line, render_line, DisplayFields, FIXED_COLUMNS};

/// Snapshot of one transfer right after a chunk was written.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub destination_name: Arc<str>,
    /// `floor(bytes * 100 / total)`; `None` when the total is unknown or zero.
    pub percent: Option<u64>,
    pub bytes_transferred: u64,
    pub total_size: Option<u64>,
    /// Bytes per second from the rate estimator.
    pub current_rate: f64,
    pub eta: Option<Duration>,
}

impl ProgressEvent {
    /// Fraction complete in [0.0, 1.0], if the total is known and non-zero.
    pub fn fraction(&self) -> Option<f64> {
        match self.total_size {
            Some(total) if total > 0 => {
                Some((self.bytes_transferred as f64 / total as f64).min(1.0))
            }
            _ => None,
        }
    }
}

/// Consumer of progress events. Shared by every transfer of a run, so
/// implementations must serialize their own output.
pub trait ProgressSink: Send + Sync + 'static {
    fn on_progress(&self, event: &ProgressEvent);

    /// Called once per transfer after it reached a terminal state.
    fn on_finished(&self, _result: &TransferResult) {}
}

/// Discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
