//! # Dispatcher
//!
//! Output routing for a streaming transfer.
//!
//! Responsible for:
//! - Holding per-channel option slots (`WriteOptions`)
//! - Resolving which slot receives each channel (`selector`)
//! - Routing every chunk to its sink and turning sink refusals into a
//!   transfer abort (`StreamDispatcher`)

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod options;
pub mod selector;
pub mod sinks;
pub mod sources;
pub mod transfer;

pub use contracts::{ByteSink, Channel, WriteCallback, WriteOutcome};
pub use dispatcher::{StreamDispatcher, TransferReport, TransferState};
pub use error::DispatcherError;
pub use metrics::{ChannelMetrics, MetricsSnapshot};
pub use options::{SlotState, WriteOptions};
pub use selector::{resolve, resolve_slots, ResolvedRouting, Route};
pub use sinks::{
    create_sink, BufferSink, ConfiguredSink, DiscardSink, FileSink, LogSink, WriterSink,
};
pub use sources::{CaptureSource, ScriptedSource};
pub use transfer::{perform, perform_reporting};
