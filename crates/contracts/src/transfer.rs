//! Transfer engine interface
//!
//! The engine feeds chunks through [`TransferHooks`]; an engine that produces
//! events asynchronously exposes them as a [`TransferSource`].

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Channel, ContractError};

/// Chunk received from the engine, tagged by origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    /// Header data (one header line per event for HTTP/1.x)
    Header(Bytes),
    /// Body data
    Body(Bytes),
}

impl TransferEvent {
    /// Channel this chunk belongs to
    pub fn channel(&self) -> Channel {
        match self {
            Self::Header(_) => Channel::Header,
            Self::Body(_) => Channel::Body,
        }
    }

    /// Chunk payload
    pub fn bytes(&self) -> &Bytes {
        match self {
            Self::Header(b) | Self::Body(b) => b,
        }
    }
}

/// Continue-or-abort decision returned to the engine after each chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Abort,
}

/// Why a transfer ended abnormally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferErrorKind {
    /// Connection setup or I/O on the wire failed
    Connection,
    /// Engine timeout
    Timeout,
    /// Malformed response
    Protocol,
    /// A sink refused data
    Write,
}

impl fmt::Display for TransferErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connection => "connection",
            Self::Timeout => "timeout",
            Self::Protocol => "protocol",
            Self::Write => "write",
        };
        f.write_str(s)
    }
}

/// Callbacks the transfer engine invokes during one transfer
pub trait TransferHooks {
    /// Transfer begins; routing is resolved here
    fn on_start(&mut self);

    /// One chunk of header data
    fn on_header_chunk(&mut self, chunk: &[u8]) -> Flow;

    /// One chunk of body data
    fn on_body_chunk(&mut self, chunk: &[u8]) -> Flow;

    /// No more chunks will be delivered
    fn on_complete(&mut self);

    /// The engine stopped the transfer
    fn on_error(&mut self, kind: TransferErrorKind);
}

/// Asynchronous producer of transfer events
#[trait_variant::make(TransferSource: Send)]
pub trait LocalTransferSource {
    /// Source name (used for logging)
    fn name(&self) -> &str;

    /// Next chunk, or `None` at normal end of transfer
    ///
    /// # Errors
    /// Returns `ContractError::Transfer` when the engine fails mid-transfer
    async fn next_event(&mut self) -> Result<Option<TransferEvent>, ContractError>;
}
