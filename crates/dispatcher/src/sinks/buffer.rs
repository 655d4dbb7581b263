//! BufferSink - shared in-memory accumulator

use std::sync::{Arc, Mutex, MutexGuard};

use contracts::{ByteSink, WriteOutcome};
use tracing::trace;

/// Sink that appends every chunk to a shared buffer
///
/// Clones share the same buffer, so a caller can hand one clone to a
/// transfer and read the result through another.
#[derive(Debug, Clone)]
pub struct BufferSink {
    name: String,
    buffer: Arc<Mutex<Vec<u8>>>,
    limit: Option<usize>,
}

impl BufferSink {
    /// Unbounded buffer
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buffer: Arc::new(Mutex::new(Vec::new())),
            limit: None,
        }
    }

    /// Buffer that accepts at most `limit` bytes in total; writes past the
    /// limit are short
    pub fn with_limit(name: impl Into<String>, limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new(name)
        }
    }

    /// Copy of the accumulated bytes
    pub fn contents(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// Accumulated bytes as (lossy) UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop accumulated bytes
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        // a panicking writer leaves plain bytes behind, still readable
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ByteSink for BufferSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, chunk: &[u8]) -> WriteOutcome {
        let mut buffer = self.lock();
        let accepted = match self.limit {
            Some(limit) => chunk.len().min(limit.saturating_sub(buffer.len())),
            None => chunk.len(),
        };
        buffer.extend_from_slice(&chunk[..accepted]);
        trace!(sink = %self.name, offered = chunk.len(), accepted, "Buffered chunk");
        WriteOutcome::Accepted(accepted)
    }
}
