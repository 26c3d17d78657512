//! Destination file collaborator.
//!
//! Each transfer writes sequentially into its own file, created with
//! truncate-create semantics. The handle lives inside the sink value, so it
//! is closed on every exit path when the sink is dropped.

mod file;

use std::future::Future;
use std::path::PathBuf;

use crate::error::TransferError;

pub use file::FileSink;

/// Sequential chunk writer for one transfer.
pub trait ChunkSink: Send {
    fn write_chunk(
        &mut self,
        data: &[u8],
    ) -> impl Future<Output = Result<(), TransferError>> + Send;

    /// Flushes buffered data; called once after the last chunk.
    fn finish(&mut self) -> impl Future<Output = Result<(), TransferError>> + Send;
}

/// Creates the sink for a destination name.
pub trait SinkOpener: Send + Sync + 'static {
    type Sink: ChunkSink;

    fn create(&self, name: &str) -> impl Future<Output = Result<Self::Sink, TransferError>> + Send;
}

/// Creates files directly under one output directory.
#[derive(Debug, Clone)]
pub struct DirSinkOpener {
    dir: PathBuf,
}

impl DirSinkOpener {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SinkOpener for DirSinkOpener {
    type Sink = FileSink;

    async fn create(&self, name: &str) -> Result<FileSink, TransferError> {
        FileSink::create(self.dir.join(name)).await
    }
}
