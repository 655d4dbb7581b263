//! Layered error definitions
//!
//! Categorized by source: config / sink / transfer

use thiserror::Error;

use crate::TransferErrorKind;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== Transfer Errors =====
    /// Transfer engine failure
    #[error("transfer {kind} error: {message}")]
    Transfer {
        kind: TransferErrorKind,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create transfer error
    pub fn transfer(kind: TransferErrorKind, message: impl Into<String>) -> Self {
        Self::Transfer {
            kind,
            message: message.into(),
        }
    }

    /// Transfer error kind this error maps to when it ends a transfer
    pub fn transfer_kind(&self) -> TransferErrorKind {
        match self {
            Self::Transfer { kind, .. } => *kind,
            Self::SinkWrite { .. } => TransferErrorKind::Write,
            Self::ConfigParse { .. } | Self::ConfigValidation { .. } => {
                TransferErrorKind::Protocol
            }
            Self::Io(_) => TransferErrorKind::Connection,
        }
    }
}
