//! In-memory stream and progress fakes for engine tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::TransferError;
use crate::http::{ChunkStream, StreamOpener};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::transfer::{TransferResult, TransferState};

/// What a scripted URL serves.
#[derive(Debug, Clone)]
pub struct Script {
    body: Vec<u8>,
    chunk: usize,
    advertise_length: bool,
    fail_after: Option<usize>,
    delay: Option<Duration>,
}

impl Script {
    /// `total` bytes of a repeating pattern, delivered `chunk` bytes at a time.
    pub fn fixed(total: usize, chunk: usize) -> Self {
        Self {
            body: (0..total).map(|i| (i % 251) as u8).collect(),
            chunk: chunk.max(1),
            advertise_length: true,
            fail_after: None,
            delay: None,
        }
    }

    pub fn body(&self) -> Vec<u8> {
        self.body.clone()
    }

    pub fn without_length(mut self) -> Self {
        self.advertise_length = false;
        self
    }

    /// Errors on the read following the `n`th chunk.
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Sleeps before every read.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Opens scripted streams; unknown URLs fail like a refused connection.
#[derive(Debug, Default)]
pub struct ScriptedOpener {
    scripts: HashMap<String, Script>,
    active: Arc<AtomicUsize>,
    peak_active: Arc<AtomicUsize>,
}

impl ScriptedOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, script: Script) -> Self {
        self.scripts.insert(url.to_string(), script);
        self
    }

    /// Most streams ever open at the same time.
    pub fn peak_active(&self) -> usize {
        self.peak_active.load(Ordering::SeqCst)
    }
}

impl StreamOpener for ScriptedOpener {
    type Stream = ScriptedStream;

    async fn open(&self, url: &str) -> Result<ScriptedStream, TransferError> {
        let script = self
            .scripts
            .get(url)
            .cloned()
            .ok_or_else(|| TransferError::network(format!("connection refused: {}", url)))?;
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_active.fetch_max(now, Ordering::SeqCst);
        let content_length = script.advertise_length.then_some(script.body.len() as u64);
        Ok(ScriptedStream {
            chunks: script.body.chunks(script.chunk).map(<[u8]>::to_vec).collect(),
            content_length,
            fail_after: script.fail_after,
            delay: script.delay,
            served: 0,
            active: Arc::clone(&self.active),
        })
    }
}

#[derive(Debug)]
pub struct ScriptedStream {
    chunks: VecDeque<Vec<u8>>,
    content_length: Option<u64>,
    fail_after: Option<usize>,
    delay: Option<Duration>,
    served: usize,
    active: Arc<AtomicUsize>,
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ChunkStream for ScriptedStream {
    fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    async fn read_chunk(&mut self, max: usize) -> Result<Vec<u8>, TransferError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_after == Some(self.served) {
            return Err(TransferError::network("connection reset by peer"));
        }
        let Some(mut chunk) = self.chunks.pop_front() else {
            return Ok(Vec::new());
        };
        if chunk.len() > max {
            let rest = chunk.split_off(max);
            self.chunks.push_front(rest);
        }
        self.served += 1;
        Ok(chunk)
    }
}

/// Keeps every event and terminal state it sees.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
    finished: Mutex<Vec<(String, TransferState)>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Vec<(String, TransferState)> {
        self.finished.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn on_progress(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn on_finished(&self, result: &TransferResult) {
        self.finished
            .lock()
            .unwrap()
            .push((result.url.clone(), result.state));
    }
}
