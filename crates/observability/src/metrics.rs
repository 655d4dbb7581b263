//! Transfer metrics
//!
//! Prometheus counters for channel writes plus an in-memory aggregator for
//! run summaries.

use contracts::{Channel, TransferErrorKind};
use metrics::{counter, histogram};

/// Record per-channel write totals of one transfer
pub fn record_channel_writes(channel: Channel, chunks: u64, bytes: u64, failures: u64) {
    counter!("outroute_chunks_written_total", "channel" => channel.as_str()).increment(chunks);
    counter!("outroute_bytes_written_total", "channel" => channel.as_str()).increment(bytes);
    if failures > 0 {
        counter!("outroute_write_failures_total", "channel" => channel.as_str())
            .increment(failures);
    }
}

/// Outcome of one transfer, as fed to metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferOutcome {
    pub completed: bool,
    pub body_bytes: u64,
    pub header_bytes: u64,
    pub failure: Option<TransferErrorKind>,
}

/// Record the end of a transfer
pub fn record_transfer(outcome: &TransferOutcome) {
    let status = if outcome.completed {
        "completed"
    } else {
        "aborted"
    };
    counter!("outroute_transfers_total", "status" => status).increment(1);
    histogram!("outroute_transfer_body_bytes").record(outcome.body_bytes as f64);
    histogram!("outroute_transfer_header_bytes").record(outcome.header_bytes as f64);

    if let Some(kind) = outcome.failure {
        counter!("outroute_transfer_failures_total", "kind" => kind.to_string()).increment(1);
    }
}

/// Transfer statistics aggregator
///
/// Aggregates in memory for run summaries.
#[derive(Debug, Clone, Default)]
pub struct TransferStatsAggregator {
    pub total_transfers: u64,
    pub completed: u64,
    pub aborted: u64,
    pub write_failures: u64,
    pub body_stats: RunningStats,
    pub header_stats: RunningStats,
}

impl TransferStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one transfer
    pub fn update(&mut self, outcome: &TransferOutcome) {
        self.total_transfers += 1;
        if outcome.completed {
            self.completed += 1;
        } else {
            self.aborted += 1;
        }
        if outcome.failure == Some(TransferErrorKind::Write) {
            self.write_failures += 1;
        }
        self.body_stats.push(outcome.body_bytes as f64);
        self.header_stats.push(outcome.header_bytes as f64);
    }

    /// Build a summary report
    pub fn summary(&self) -> TransferSummary {
        TransferSummary {
            total_transfers: self.total_transfers,
            completed: self.completed,
            aborted: self.aborted,
            write_failures: self.write_failures,
            abort_rate: if self.total_transfers > 0 {
                self.aborted as f64 / self.total_transfers as f64 * 100.0
            } else {
                0.0
            },
            body_bytes: StatsSummary::from(&self.body_stats),
            header_bytes: StatsSummary::from(&self.header_stats),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct TransferSummary {
    pub total_transfers: u64,
    pub completed: u64,
    pub aborted: u64,
    pub write_failures: u64,
    pub abort_rate: f64,
    pub body_bytes: StatsSummary,
    pub header_bytes: StatsSummary,
}

impl std::fmt::Display for TransferSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Transfer Summary ===")?;
        writeln!(f, "Transfers: {}", self.total_transfers)?;
        writeln!(f, "Completed: {}", self.completed)?;
        writeln!(f, "Aborted: {} ({:.2}%)", self.aborted, self.abort_rate)?;
        writeln!(f, "Write failures: {}", self.write_failures)?;
        writeln!(f, "Body bytes: {}", self.body_bytes)?;
        writeln!(f, "Header bytes: {}", self.header_bytes)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.0}, max={:.0}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a sample
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
