//! ByteSink trait - output interface for a single channel
//!
//! Two kinds of destination can be registered for a channel: an object
//! implementing [`ByteSink`], or a free [`WriteCallback`]. Both share the
//! same contract and report a [`WriteOutcome`].

use crate::ContractError;

/// Result of handing one chunk to a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Number of bytes consumed. Anything other than the chunk length is a short write.
    Accepted(usize),
    /// The sink asks for the transfer to stop
    Abort,
}

impl WriteOutcome {
    /// Outcome reporting that the whole chunk was consumed
    pub fn accept_all(chunk: &[u8]) -> Self {
        Self::Accepted(chunk.len())
    }

    /// True when this outcome fully accepts a chunk of `len` bytes
    pub fn accepts(&self, len: usize) -> bool {
        matches!(self, Self::Accepted(n) if *n == len)
    }
}

/// Object-style sink
///
/// The dispatcher never retains `chunk` past the call; implementations must
/// copy whatever they keep.
pub trait ByteSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Consume one chunk
    fn write(&mut self, chunk: &[u8]) -> WriteOutcome;

    /// Flush buffered output at the end of a transfer
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}

/// Callback-style sink
pub type WriteCallback<'a> = Box<dyn FnMut(&[u8]) -> WriteOutcome + 'a>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_all() {
        let outcome = WriteOutcome::accept_all(b"success");
        assert_eq!(outcome, WriteOutcome::Accepted(7));
        assert!(outcome.accepts(7));
    }

    #[test]
    fn test_short_and_abort_do_not_accept() {
        assert!(!WriteOutcome::Accepted(3).accepts(7));
        assert!(!WriteOutcome::Accepted(8).accepts(7));
        assert!(!WriteOutcome::Abort.accepts(0));
    }
}
