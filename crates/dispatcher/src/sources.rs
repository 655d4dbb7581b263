//! Transfer sources - event producers standing in for a transfer engine
//!
//! `ScriptedSource` replays a fixed event list; `CaptureSource` replays a raw
//! HTTP/1.x response capture the way an HTTP client would hand it out: one
//! header chunk per header line, then the body in bounded pieces.

use std::collections::VecDeque;
use std::path::Path;

use bytes::{Bytes, BytesMut};
use contracts::{
    ContractError, TransferErrorKind, TransferEvent, TransferSettings, TransferSource,
};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tracing::{debug, trace};

/// Source replaying a scripted list of events
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    name: String,
    events: VecDeque<TransferEvent>,
    fail_after: Option<(usize, TransferErrorKind)>,
    emitted: usize,
}

impl ScriptedSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: VecDeque::new(),
            fail_after: None,
            emitted: 0,
        }
    }

    /// Response with a status line, headers, the blank separator line and a
    /// single body chunk
    pub fn http_response(status_line: &str, headers: &[(&str, &str)], body: &[u8]) -> Self {
        let mut source = Self::new("scripted_response").header(format!("{status_line}\r\n"));
        for (name, value) in headers {
            source = source.header(format!("{name}: {value}\r\n"));
        }
        source = source.header("\r\n");
        if !body.is_empty() {
            source = source.body(Bytes::copy_from_slice(body));
        }
        source
    }

    pub fn header(mut self, chunk: impl Into<Bytes>) -> Self {
        self.events.push_back(TransferEvent::Header(chunk.into()));
        self
    }

    pub fn body(mut self, chunk: impl Into<Bytes>) -> Self {
        self.events.push_back(TransferEvent::Body(chunk.into()));
        self
    }

    /// Fail with `kind` once `count` events have been emitted
    pub fn fail_after(mut self, count: usize, kind: TransferErrorKind) -> Self {
        self.fail_after = Some((count, kind));
        self
    }

    /// Events not yet emitted
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl TransferSource for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn next_event(&mut self) -> Result<Option<TransferEvent>, ContractError> {
        if let Some((count, kind)) = self.fail_after {
            if self.emitted >= count {
                return Err(ContractError::transfer(
                    kind,
                    format!("scripted failure after {count} events"),
                ));
            }
        }

        let event = self.events.pop_front();
        if event.is_some() {
            self.emitted += 1;
        }
        Ok(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Expecting a status line
    StatusLine,
    /// Inside a header block; `interim` for 1xx responses
    Headers { interim: bool },
    Body,
    Done,
}

/// Source replaying a raw HTTP/1.x response capture
///
/// Interim `1xx` header blocks are passed through like final ones. Body bytes
/// are delivered exactly as captured.
pub struct CaptureSource<R> {
    name: String,
    reader: BufReader<R>,
    chunk_size: usize,
    body: BytesMut,
    phase: Phase,
}

impl<R: AsyncRead + Unpin + Send> CaptureSource<R> {
    pub fn new(name: impl Into<String>, reader: R, chunk_size: usize) -> Self {
        Self {
            name: name.into(),
            reader: BufReader::new(reader),
            chunk_size: chunk_size.clamp(1, TransferSettings::MAX_CHUNK_SIZE),
            body: BytesMut::new(),
            phase: Phase::StatusLine,
        }
    }

    async fn next_header_line(&mut self) -> Result<TransferEvent, ContractError> {
        let mut line = Vec::new();
        let n = self
            .reader
            .read_until(b'\n', &mut line)
            .await
            .map_err(|e| ContractError::transfer(TransferErrorKind::Connection, e.to_string()))?;
        if n == 0 {
            return Err(ContractError::transfer(
                TransferErrorKind::Protocol,
                "capture ended inside the header block",
            ));
        }

        self.phase = match self.phase {
            Phase::StatusLine => Phase::Headers {
                interim: is_interim_status(&line)?,
            },
            Phase::Headers { interim } if is_blank_line(&line) => {
                if interim {
                    debug!(source = %self.name, "Interim response finished");
                    Phase::StatusLine
                } else {
                    Phase::Body
                }
            }
            other => other,
        };

        trace!(source = %self.name, bytes = line.len(), "Header line");
        Ok(TransferEvent::Header(Bytes::from(line)))
    }

    async fn next_body_chunk(&mut self) -> Result<Option<TransferEvent>, ContractError> {
        self.body.reserve(self.chunk_size);
        let n = (&mut self.reader)
            .take(self.chunk_size as u64)
            .read_buf(&mut self.body)
            .await
            .map_err(|e| ContractError::transfer(TransferErrorKind::Connection, e.to_string()))?;
        if n == 0 {
            self.phase = Phase::Done;
            return Ok(None);
        }
        Ok(Some(TransferEvent::Body(self.body.split().freeze())))
    }
}

impl CaptureSource<tokio::fs::File> {
    /// Capture stored in a file
    pub async fn open(path: impl AsRef<Path>, chunk_size: usize) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::new(path.display().to_string(), file, chunk_size))
    }
}

impl<R: AsyncRead + Unpin + Send> TransferSource for CaptureSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn next_event(&mut self) -> Result<Option<TransferEvent>, ContractError> {
        match self.phase {
            Phase::StatusLine | Phase::Headers { .. } => self.next_header_line().await.map(Some),
            Phase::Body => self.next_body_chunk().await,
            Phase::Done => Ok(None),
        }
    }
}

fn is_blank_line(line: &[u8]) -> bool {
    line == b"\r\n" || line == b"\n"
}

/// Parse the status code of `HTTP/x.y NNN reason`
fn is_interim_status(line: &[u8]) -> Result<bool, ContractError> {
    let text = String::from_utf8_lossy(line);
    let mut parts = text.split_whitespace();
    let status = match (parts.next(), parts.next()) {
        (Some(version), Some(code)) if version.starts_with("HTTP/") => code.parse::<u16>().ok(),
        _ => None,
    };
    match status {
        Some(code) => Ok((100..200).contains(&code)),
        None => Err(ContractError::transfer(
            TransferErrorKind::Protocol,
            format!("malformed status line: {}", text.trim_end()),
        )),
    }
}
