//! Error types for transfers, size formatting, and scheduling.

use std::path::PathBuf;

/// Failure of a single transfer. Recorded in that transfer's result only;
/// sibling transfers are never affected.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Stream open or read failed (curl error, HTTP status, malformed URL).
    #[error("network: {0}")]
    Network(String),
    /// Destination file could not be created or written.
    #[error("filesystem: {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TransferError {
    pub fn network(msg: impl Into<String>) -> Self {
        TransferError::Network(msg.into())
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TransferError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Short label used by the progress display.
    pub fn kind(&self) -> &'static str {
        match self {
            TransferError::Network(_) => "network",
            TransferError::Filesystem { .. } => "filesystem",
        }
    }
}

impl From<curl::Error> for TransferError {
    fn from(e: curl::Error) -> Self {
        TransferError::Network(e.to_string())
    }
}

/// A value outside the domain of the human-readable size formatter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SizeError {
    #[error("size must be non-negative, got {0}")]
    Negative(f64),
    #[error("size is not a finite number")]
    NotFinite,
    #[error("number too large: {0}")]
    Overflow(f64),
}

/// Coordination failures in the scheduler. These indicate a bug, not a
/// transfer problem, and abort the whole run.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("permit pool closed while transfers were pending")]
    PermitPoolClosed,
    #[error("transfer task join: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("no result recorded for transfer {0}")]
    MissingResult(usize),
}
