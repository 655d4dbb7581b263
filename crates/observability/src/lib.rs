//! # Observability
//!
//! Tracing and Prometheus metrics.
//!
//! ## Features
//!
//! - Tracing initialisation (JSON/Pretty/Compact, always on stderr)
//! - Prometheus metrics export
//! - Per-channel write metrics and transfer statistics
//!
//! ## Example
//!
//! ```ignore
//! use observability::{metrics, ObservabilityConfig};
//!
//! observability::init_with_config(ObservabilityConfig::from_verbosity(1, false))?;
//!
//! let (report, result) = dispatcher::perform_reporting(&mut source, &mut options).await;
//! metrics::record_channel_writes(Channel::Body, report.body.chunk_count, report.body.byte_count, 0);
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Re-exports
pub use crate::metrics::{
    record_channel_writes, record_transfer, RunningStats, StatsSummary,
    TransferOutcome, TransferStatsAggregator, TransferSummary,
};

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
    /// Prometheus port (None = disabled)
    pub metrics_port: Option<u16>,
    /// Filter directive used when `RUST_LOG` is unset or ignored
    pub log_level: String,
    /// Let `RUST_LOG` override `log_level`
    pub honour_env: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            metrics_port: None,
            log_level: "info".to_string(),
            honour_env: true,
        }
    }
}

impl ObservabilityConfig {
    /// Level from `-v` / `-q` style flags; quiet pins `warn` regardless of `RUST_LOG`
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let (log_level, honour_env) = match (quiet, verbose) {
            (true, _) => ("warn", false),
            (false, 0) => ("info", true),
            (false, 1) => ("debug", true),
            (false, _) => ("trace", true),
        };
        Self {
            log_level: log_level.to_string(),
            honour_env,
            ..Self::default()
        }
    }

    pub fn with_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        if self.honour_env {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level))
        } else {
            EnvFilter::new(&self.log_level)
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logs
    Json,
    /// Human-readable
    #[default]
    Pretty,
    /// Compact single line
    Compact,
}

/// Initialise tracing (and Prometheus when a port is set)
///
/// Every format writes to stderr: stdout carries the body when it resolves to
/// the default sink.
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::debug!(
        log_format = ?config.log_format,
        metrics_port = ?config.metrics_port,
        "Observability initialized"
    );

    Ok(())
}

/// Initialise only the Prometheus exporter
///
/// For callers that set up tracing themselves.
pub fn init_metrics_only(port: u16) -> Result<()> {
    let builder = PrometheusBuilder::new();
    builder
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}
