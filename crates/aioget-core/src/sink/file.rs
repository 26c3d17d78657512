//! Truncate-create file sink.

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use super::ChunkSink;
use crate::error::TransferError;

/// Open destination file. Closed when dropped.
#[derive(Debug)]
pub struct FileSink {
    file: tokio::fs::File,
    path: PathBuf,
}

impl FileSink {
    /// Creates `path`, truncating any existing file.
    pub async fn create(path: PathBuf) -> Result<Self, TransferError> {
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .await
            .map_err(|e| TransferError::filesystem(&path, e))?;
        Ok(Self { file, path })
    }
}

impl ChunkSink for FileSink {
    async fn write_chunk(&mut self, data: &[u8]) -> Result<(), TransferError> {
        self.file
            .write_all(data)
            .await
            .map_err(|e| TransferError::filesystem(&self.path, e))
    }

    async fn finish(&mut self) -> Result<(), TransferError> {
        self.file
            .flush()
            .await
            .map_err(|e| TransferError::filesystem(&self.path, e))
    }
}
