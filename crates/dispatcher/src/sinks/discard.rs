//! DiscardSink - accepts and drops everything

use contracts::{ByteSink, WriteOutcome};

/// Sink that accepts every chunk and keeps only a byte count
#[derive(Debug)]
pub struct DiscardSink {
    name: String,
    discarded: u64,
}

impl DiscardSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            discarded: 0,
        }
    }

    /// Total bytes dropped so far
    pub fn discarded(&self) -> u64 {
        self.discarded
    }
}

impl ByteSink for DiscardSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, chunk: &[u8]) -> WriteOutcome {
        self.discarded += chunk.len() as u64;
        WriteOutcome::accept_all(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discard_counts() {
        let mut sink = DiscardSink::new("null");
        assert_eq!(sink.write(b"abc"), WriteOutcome::Accepted(3));
        assert_eq!(sink.write(b""), WriteOutcome::Accepted(0));
        assert_eq!(sink.discarded(), 3);
        assert_eq!(sink.name(), "null");
    }
}
