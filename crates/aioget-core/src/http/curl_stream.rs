//! libcurl-backed streaming GET.
//!
//! `Easy::perform` blocks, so each request runs under `spawn_blocking` and
//! pushes [`StreamEvent`]s through a bounded channel. The channel bound gives
//! backpressure: curl stalls in `blocking_send` until the transfer loop has
//! written earlier chunks. Dropping the [`CurlStream`] closes the receiver,
//! which makes the next write callback abort the request.

use std::cell::Cell;
use std::str;
use std::time::Duration;

use tokio::sync::mpsc;

use super::headers::{classify_header_line, HeaderLine};
use super::{ChunkStream, StreamOpener};
use crate::error::TransferError;

/// Tuning for curl handles.
#[derive(Debug, Clone)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Receive buffer size; also the largest chunk curl hands to the write callback.
    pub buffer_size: usize,
    /// Optional bandwidth cap per transfer (bytes/sec).
    pub max_recv_speed: Option<u64>,
    pub max_redirections: u32,
    /// Chunks buffered between curl and the transfer loop.
    pub channel_capacity: usize,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            buffer_size: 4096,
            max_recv_speed: None,
            max_redirections: 10,
            channel_capacity: 16,
        }
    }
}

#[derive(Debug)]
enum StreamEvent {
    /// Final response headers are in; carries the declared length.
    Opened(Option<u64>),
    Data(Vec<u8>),
    Failed(TransferError),
}

/// Opens GET requests with libcurl.
#[derive(Debug, Clone, Default)]
pub struct CurlOpener {
    options: CurlOptions,
}

impl CurlOpener {
    pub fn new(options: CurlOptions) -> Self {
        Self { options }
    }
}

impl StreamOpener for CurlOpener {
    type Stream = CurlStream;

    async fn open(&self, url: &str) -> Result<CurlStream, TransferError> {
        let (tx, mut rx) = mpsc::channel(self.options.channel_capacity.max(1));
        let url = url.to_string();
        let options = self.options.clone();
        // Detached: the worker ends on its own once the receiver is gone.
        let _worker = tokio::task::spawn_blocking(move || perform_get(&url, &options, &tx));

        match rx.recv().await {
            Some(StreamEvent::Opened(content_length)) => Ok(CurlStream {
                rx,
                pending: Vec::new(),
                content_length,
            }),
            Some(StreamEvent::Failed(e)) => Err(e),
            Some(StreamEvent::Data(_)) => {
                Err(TransferError::network("body arrived before headers"))
            }
            None => Err(TransferError::network("request ended without a response")),
        }
    }
}

/// Response body fed by a curl worker thread.
#[derive(Debug)]
pub struct CurlStream {
    rx: mpsc::Receiver<StreamEvent>,
    pending: Vec<u8>,
    content_length: Option<u64>,
}

impl ChunkStream for CurlStream {
    fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    async fn read_chunk(&mut self, max: usize) -> Result<Vec<u8>, TransferError> {
        while self.pending.is_empty() {
            match self.rx.recv().await {
                Some(StreamEvent::Data(data)) => self.pending = data,
                Some(StreamEvent::Failed(e)) => return Err(e),
                Some(StreamEvent::Opened(_)) => {}
                None => return Ok(Vec::new()),
            }
        }
        let take = max.max(1).min(self.pending.len());
        let rest = self.pending.split_off(take);
        Ok(std::mem::replace(&mut self.pending, rest))
    }
}

/// Runs on a blocking thread. Every outcome is reported through `tx`.
fn perform_get(url: &str, options: &CurlOptions, tx: &mpsc::Sender<StreamEvent>) {
    if let Err(e) = drive_easy(url, options, tx) {
        tracing::debug!(url, error = %e, "GET failed");
        let _ = tx.blocking_send(StreamEvent::Failed(e));
    }
}

fn drive_easy(
    url: &str,
    options: &CurlOptions,
    tx: &mpsc::Sender<StreamEvent>,
) -> Result<(), TransferError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(options.max_redirections)?;
    easy.fail_on_error(true)?;
    easy.connect_timeout(options.connect_timeout)?;
    easy.buffer_size(options.buffer_size)?;
    easy.low_speed_limit(1)?;
    easy.low_speed_time(Duration::from_secs(60))?;
    if let Some(speed) = options.max_recv_speed {
        easy.max_recv_speed(speed)?;
    }

    let content_length: Cell<Option<u64>> = Cell::new(None);
    let opened = Cell::new(false);
    let receiver_gone = Cell::new(false);

    // Called on the first body byte, or after perform for empty bodies.
    let announce = || -> bool {
        if opened.replace(true) {
            return true;
        }
        tx.blocking_send(StreamEvent::Opened(content_length.get())).is_ok()
    };

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(line) = str::from_utf8(data) {
                match classify_header_line(line) {
                    // Each redirect hop starts a fresh header block.
                    HeaderLine::Status => content_length.set(None),
                    HeaderLine::ContentLength(len) => content_length.set(len),
                    HeaderLine::Other => {}
                }
            }
            true
        })?;
        transfer.write_function(|data| {
            if !announce() || tx.blocking_send(StreamEvent::Data(data.to_vec())).is_err() {
                receiver_gone.set(true);
                return Ok(0);
            }
            Ok(data.len())
        })?;
        if let Err(e) = transfer.perform() {
            if receiver_gone.get() {
                return Ok(());
            }
            return Err(e.into());
        }
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(TransferError::network(format!("GET {} returned HTTP {}", url, code)));
    }
    announce();
    Ok(())
}
