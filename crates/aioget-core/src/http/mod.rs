//! Streaming HTTP GET collaborator.
//!
//! The transfer loop only sees [`StreamOpener`] and [`ChunkStream`]; the
//! production implementation is [`CurlOpener`], which drives libcurl on a
//! blocking thread and hands body chunks over a bounded channel.

mod curl_stream;
mod headers;

use std::future::Future;

use crate::error::TransferError;

pub use curl_stream::{CurlOpener, CurlOptions, CurlStream};
pub use headers::{classify_header_line, HeaderLine};

/// An open response body read in bounded chunks.
pub trait ChunkStream: Send {
    /// Declared body length, if the server sent a parseable `Content-Length`.
    fn content_length(&self) -> Option<u64>;

    /// Reads at most `max` bytes. An empty vector means the body is exhausted.
    fn read_chunk(
        &mut self,
        max: usize,
    ) -> impl Future<Output = Result<Vec<u8>, TransferError>> + Send;
}

/// Opens a streaming GET for a URL.
pub trait StreamOpener: Send + Sync + 'static {
    type Stream: ChunkStream;

    /// Resolves once response headers are available (or the request failed).
    fn open(&self, url: &str) -> impl Future<Output = Result<Self::Stream, TransferError>> + Send;
}
