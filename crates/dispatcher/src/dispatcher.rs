//! StreamDispatcher - routes each chunk of one transfer to its resolved sink
//!
//! Lifecycle: `Idle -> Active -> {Completed, Aborted}`. Routing is resolved
//! once in `start` and never changes afterwards; the dispatcher holds the
//! options mutably for the whole transfer.

use std::fmt;

use contracts::{
    Channel, ContractError, Flow, TransferErrorKind, TransferHooks, WriteOutcome,
};
use serde::Serialize;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::DispatcherError;
use crate::metrics::{ChannelMetrics, MetricsSnapshot};
use crate::options::WriteOptions;
use crate::selector::{resolve, ResolvedRouting, Route};

/// Transfer lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    Idle,
    Active,
    Completed,
    Aborted,
}

impl TransferState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Summary of one transfer
#[derive(Debug, Clone, Serialize)]
pub struct TransferReport {
    pub state: TransferState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<ResolvedRouting>,
    pub body: MetricsSnapshot,
    pub header: MetricsSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<TransferErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransferReport {
    pub fn channel(&self, channel: Channel) -> &MetricsSnapshot {
        match channel {
            Channel::Body => &self.body,
            Channel::Header => &self.header,
        }
    }
}

/// Dispatcher for a single transfer
pub struct StreamDispatcher<'t, 'a> {
    options: &'t mut WriteOptions<'a>,
    routing: Option<ResolvedRouting>,
    state: TransferState,
    body_metrics: ChannelMetrics,
    header_metrics: ChannelMetrics,
    failure: Option<TransferErrorKind>,
    error: Option<String>,
}

impl<'t, 'a> StreamDispatcher<'t, 'a> {
    /// Idle dispatcher over `options`
    pub fn new(options: &'t mut WriteOptions<'a>) -> Self {
        Self {
            options,
            routing: None,
            state: TransferState::Idle,
            body_metrics: ChannelMetrics::new(),
            header_metrics: ChannelMetrics::new(),
            failure: None,
            error: None,
        }
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    /// Routing snapshot, available once started
    pub fn routing(&self) -> Option<ResolvedRouting> {
        self.routing
    }

    pub fn metrics(&self, channel: Channel) -> &ChannelMetrics {
        match channel {
            Channel::Body => &self.body_metrics,
            Channel::Header => &self.header_metrics,
        }
    }

    /// Resolve routing and begin accepting chunks
    #[instrument(name = "dispatcher_start", skip(self))]
    pub fn start(&mut self) -> Result<ResolvedRouting, DispatcherError> {
        if self.state != TransferState::Idle {
            return Err(DispatcherError::NotActive {
                state: self.state,
                operation: "start",
            });
        }

        let routing = resolve(self.options);
        info!(
            body = %routing.body,
            header = %routing.header,
            shared = routing.is_shared(),
            "Routing resolved"
        );

        self.routing = Some(routing);
        self.state = TransferState::Active;
        Ok(routing)
    }

    /// Hand one chunk to the channel's resolved sink
    ///
    /// A short write or an abort ends the transfer; nothing is delivered
    /// after that.
    pub fn deliver(&mut self, channel: Channel, chunk: &[u8]) -> Result<(), DispatcherError> {
        let routing = self.active_routing("deliver")?;
        let route = routing.route(channel);

        match self.write_routed(route, chunk) {
            WriteOutcome::Accepted(n) if n == chunk.len() => {
                let metrics = self.metrics(channel);
                metrics.inc_chunk_count();
                metrics.add_bytes(n);
                trace!(channel = %channel, route = %route, bytes = n, "Chunk delivered");
                Ok(())
            }
            WriteOutcome::Accepted(accepted) => {
                let err = DispatcherError::ShortWrite {
                    channel,
                    sink: self.sink_name(route),
                    offered: chunk.len(),
                    accepted,
                };
                self.metrics(channel).add_bytes(accepted.min(chunk.len()));
                Err(self.record_failure(channel, err))
            }
            WriteOutcome::Abort => {
                let err = DispatcherError::SinkAbort {
                    channel,
                    sink: self.sink_name(route),
                };
                Err(self.record_failure(channel, err))
            }
        }
    }

    /// Normal end of transfer: flush the resolved sinks
    #[instrument(name = "dispatcher_complete", skip(self))]
    pub fn complete(&mut self) -> Result<TransferReport, DispatcherError> {
        let routing = self.active_routing("complete")?;

        for route in routing.distinct_routes() {
            if let Err(e) = self.flush_routed(route) {
                error!(route = %route, error = %e, "Flush failed");
                self.abort(TransferErrorKind::Write, e.to_string());
                return Err(e.into());
            }
        }

        self.state = TransferState::Completed;
        info!(
            body_bytes = self.body_metrics.byte_count(),
            header_bytes = self.header_metrics.byte_count(),
            "Transfer completed"
        );
        Ok(self.report())
    }

    /// The engine stopped the transfer
    pub fn fail(&mut self, kind: TransferErrorKind) {
        if self.state.is_terminal() {
            debug!(state = %self.state, kind = %kind, "Failure after transfer ended ignored");
            return;
        }
        warn!(kind = %kind, "Transfer failed");
        self.abort(kind, format!("transfer failed: {kind}"));
    }

    /// Current summary
    pub fn report(&self) -> TransferReport {
        TransferReport {
            state: self.state,
            routing: self.routing,
            body: self.body_metrics.snapshot(),
            header: self.header_metrics.snapshot(),
            failure: self.failure,
            error: self.error.clone(),
        }
    }

    fn active_routing(&self, operation: &'static str) -> Result<ResolvedRouting, DispatcherError> {
        match (self.state, self.routing) {
            (TransferState::Active, Some(routing)) => Ok(routing),
            (state, _) => Err(DispatcherError::NotActive { state, operation }),
        }
    }

    fn record_failure(&mut self, channel: Channel, err: DispatcherError) -> DispatcherError {
        self.metrics(channel).inc_failure_count();
        warn!(channel = %channel, error = %err, "Sink write failed, aborting transfer");
        self.abort(TransferErrorKind::Write, err.to_string());
        err
    }

    fn abort(&mut self, kind: TransferErrorKind, message: String) {
        self.state = TransferState::Aborted;
        self.failure = Some(kind);
        self.error = Some(message);
    }

    fn write_routed(&mut self, route: Route, chunk: &[u8]) -> WriteOutcome {
        match route {
            Route::Callback(c) => match self.options.callback_mut(c) {
                Some(callback) => callback(chunk),
                None => unresolved(route),
            },
            Route::Object(c) => match self.options.object_mut(c) {
                Some(sink) => sink.write(chunk),
                None => unresolved(route),
            },
            Route::Default(c) => self.options.default_mut(c).write(chunk),
        }
    }

    fn flush_routed(&mut self, route: Route) -> Result<(), ContractError> {
        match route {
            Route::Callback(_) => Ok(()),
            Route::Object(c) => match self.options.object_mut(c) {
                Some(sink) => sink.flush(),
                None => unresolved(route),
            },
            Route::Default(c) => self.options.default_mut(c).flush(),
        }
    }

    fn sink_name(&self, route: Route) -> String {
        match route {
            Route::Callback(c) => format!("{c}_callback"),
            Route::Object(c) => self.options.object_name(c).unwrap_or("object").to_string(),
            Route::Default(c) => self.options.default_name(c).to_string(),
        }
    }
}

/// Routing is computed from slot presence and the options cannot change
/// while borrowed, so an empty resolved slot is a bug.
fn unresolved(route: Route) -> ! {
    panic!("resolved route {route} points at an empty slot")
}

impl TransferHooks for StreamDispatcher<'_, '_> {
    fn on_start(&mut self) {
        if let Err(e) = self.start() {
            error!(error = %e, "Start rejected");
        }
    }

    fn on_header_chunk(&mut self, chunk: &[u8]) -> Flow {
        match self.deliver(Channel::Header, chunk) {
            Ok(()) => Flow::Continue,
            Err(_) => Flow::Abort,
        }
    }

    fn on_body_chunk(&mut self, chunk: &[u8]) -> Flow {
        match self.deliver(Channel::Body, chunk) {
            Ok(()) => Flow::Continue,
            Err(_) => Flow::Abort,
        }
    }

    fn on_complete(&mut self) {
        if let Err(e) = self.complete() {
            error!(error = %e, "Completion failed");
        }
    }

    fn on_error(&mut self, kind: TransferErrorKind) {
        self.fail(kind);
    }
}
