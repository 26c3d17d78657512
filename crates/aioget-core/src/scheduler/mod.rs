//! Transfer scheduler.
//!
//! Launches one [`Transfer`](crate::transfer::Transfer) per URL, all at once,
//! gated by a [`PermitPool`] so at most `concurrency_limit` of them hold a
//! network connection. Results come back in input order.

mod parallel;
mod permits;

use std::sync::Arc;

use crate::http::StreamOpener;
use crate::progress::ProgressSink;
use crate::sink::SinkOpener;
use crate::transfer::TransferSettings;

pub use permits::{Permit, PermitPool};

/// Transfers allowed to run at once unless configured otherwise.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 4;

/// Runs batches of URLs through the given stream and sink collaborators.
pub struct Scheduler<O, S> {
    opener: Arc<O>,
    sinks: Arc<S>,
    progress: Arc<dyn ProgressSink>,
    settings: TransferSettings,
}

impl<O, S> Scheduler<O, S>
where
    O: StreamOpener,
    S: SinkOpener,
{
    pub fn new(opener: O, sinks: S, progress: Arc<dyn ProgressSink>) -> Self {
        Self {
            opener: Arc::new(opener),
            sinks: Arc::new(sinks),
            progress,
            settings: TransferSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: TransferSettings) -> Self {
        self.settings = settings;
        self
    }
}
