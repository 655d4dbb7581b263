//! Channel metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Metrics for a single channel
#[derive(Debug, Default)]
pub struct ChannelMetrics {
    /// Chunks fully accepted
    chunk_count: AtomicU64,
    /// Bytes accepted, including the prefix of a short write
    byte_count: AtomicU64,
    /// Short writes and aborts
    failure_count: AtomicU64,
}

impl ChannelMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk_count(&self) -> u64 {
        self.chunk_count.load(Ordering::Relaxed)
    }

    pub fn inc_chunk_count(&self) {
        self.chunk_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn byte_count(&self) -> u64 {
        self.byte_count.load(Ordering::Relaxed)
    }

    pub fn add_bytes(&self, bytes: usize) {
        self.byte_count.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            chunk_count: self.chunk_count(),
            byte_count: self.byte_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Point-in-time snapshot of channel metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub chunk_count: u64,
    pub byte_count: u64,
    pub failure_count: u64,
}
