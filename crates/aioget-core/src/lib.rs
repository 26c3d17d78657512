//! Concurrent multi-file download engine.
//!
//! [`scheduler::Scheduler`] runs one [`transfer::Transfer`] per URL under a
//! permit cap; each transfer streams its body to disk and reports progress
//! through a [`progress::ProgressSink`].

pub mod config;
pub mod logging;

pub mod error;
pub mod estimator;
pub mod http;
pub mod humansize;
pub mod progress;
pub mod scheduler;
pub mod sink;
pub mod transfer;
pub mod url_model;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{SchedulerError, SizeError, TransferError};
pub use humansize::approximate_size;
pub use scheduler::Scheduler;
pub use transfer::{TransferResult, TransferState};
