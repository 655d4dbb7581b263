//! Dispatcher error types

use contracts::{Channel, TransferErrorKind};
use thiserror::Error;

use crate::dispatcher::TransferState;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// A sink accepted fewer (or more) bytes than offered
    #[error("short write on {channel} channel to '{sink}': accepted {accepted} of {offered} bytes")]
    ShortWrite {
        channel: Channel,
        sink: String,
        offered: usize,
        accepted: usize,
    },

    /// A sink asked for the transfer to stop
    #[error("sink '{sink}' aborted the transfer on {channel} channel")]
    SinkAbort { channel: Channel, sink: String },

    /// Operation not valid in the current transfer state
    #[error("transfer is {state}, cannot {operation}")]
    NotActive {
        state: TransferState,
        operation: &'static str,
    },

    /// Sink creation error
    #[error("failed to create sink '{name}': {source}")]
    SinkCreation {
        name: String,
        #[source]
        source: contracts::ContractError,
    },

    /// The transfer engine stopped the transfer
    #[error("transfer failed ({kind}): {message}")]
    Transfer {
        kind: TransferErrorKind,
        message: String,
    },

    /// Sink error (from contract)
    #[error("sink error: {0}")]
    Contract(#[from] contracts::ContractError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatcherError {
    /// Create a sink creation error
    pub fn sink_creation(
        name: impl Into<String>,
        source: impl Into<contracts::ContractError>,
    ) -> Self {
        Self::SinkCreation {
            name: name.into(),
            source: source.into(),
        }
    }

    /// True for failures reported to the engine as a write error
    pub fn is_write_error(&self) -> bool {
        match self {
            Self::ShortWrite { .. } | Self::SinkAbort { .. } => true,
            Self::Transfer { kind, .. } => *kind == TransferErrorKind::Write,
            Self::Contract(e) => e.transfer_kind() == TransferErrorKind::Write,
            _ => false,
        }
    }

    /// Engine-facing kind for this failure
    pub fn transfer_kind(&self) -> TransferErrorKind {
        match self {
            Self::Transfer { kind, .. } => *kind,
            Self::Contract(e) => e.transfer_kind(),
            Self::Io(_) => TransferErrorKind::Connection,
            _ => TransferErrorKind::Write,
        }
    }
}
