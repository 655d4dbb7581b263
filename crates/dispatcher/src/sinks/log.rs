//! LogSink - logs chunk summaries via tracing

use contracts::{ByteSink, WriteOutcome};
use tracing::info;

const PREVIEW_LEN: usize = 64;

/// Sink that logs chunk summaries for debugging
pub struct LogSink {
    name: String,
    chunk_count: u64,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chunk_count: 0,
        }
    }

    pub fn chunk_count(&self) -> u64 {
        self.chunk_count
    }

    fn log_chunk_summary(&self, chunk: &[u8]) {
        let head = &chunk[..chunk.len().min(PREVIEW_LEN)];
        let preview = String::from_utf8_lossy(head);

        info!(
            sink = %self.name,
            chunk = self.chunk_count,
            bytes = chunk.len(),
            preview = %preview.trim_end(),
            "Chunk received"
        );
    }
}

impl ByteSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, chunk: &[u8]) -> WriteOutcome {
        self.chunk_count += 1;
        self.log_chunk_summary(chunk);
        WriteOutcome::accept_all(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_sink_write() {
        let mut sink = LogSink::new("test_log");
        let result = sink.write(b"content-type: text/plain\r\n");
        assert_eq!(result, WriteOutcome::Accepted(26));
        assert_eq!(sink.chunk_count(), 1);
    }

    #[test]
    fn test_log_sink_name() {
        let sink = LogSink::new("my_logger");
        assert_eq!(sink.name(), "my_logger");
    }
}
