//! WriterSink - adapts any `io::Write`, including files and stdout

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use contracts::{ByteSink, ContractError, WriteOutcome};
use tracing::{debug, instrument, warn};

use crate::error::DispatcherError;

/// Sink over an `io::Write`
///
/// A chunk is written until it is fully consumed or the writer fails; on
/// failure the sink reports the prefix it managed to write, which the
/// dispatcher treats as a short write.
pub struct WriterSink<W: Write> {
    name: String,
    writer: W,
    bytes_written: u64,
    last_error: Option<io::Error>,
}

impl<W: Write> WriterSink<W> {
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer,
            bytes_written: 0,
            last_error: None,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Error that cut the most recent write short, if any
    pub fn last_error(&self) -> Option<&io::Error> {
        self.last_error.as_ref()
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    /// Sink writing to the process standard output
    pub fn stdout() -> Self {
        Self::new("stdout", io::stdout())
    }
}

impl<W: Write> ByteSink for WriterSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, chunk: &[u8]) -> WriteOutcome {
        let mut written = 0;
        while written < chunk.len() {
            match self.writer.write(&chunk[written..]) {
                Ok(0) => {
                    self.last_error = Some(io::Error::from(ErrorKind::WriteZero));
                    break;
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(sink = %self.name, written, offered = chunk.len(), error = %e, "Write failed");
                    self.last_error = Some(e);
                    break;
                }
            }
        }
        self.bytes_written += written as u64;
        WriteOutcome::Accepted(written)
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        self.writer
            .flush()
            .map_err(|e| ContractError::sink_write(&self.name, format!("flush failed: {e}")))
    }
}

/// Configuration for FileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Output file
    pub path: PathBuf,
    /// Append instead of truncating
    pub append: bool,
}

impl FileSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ContractError> {
        let path = params
            .get("path")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                ContractError::config_validation("params.path", "missing 'path' parameter")
            })?;

        let append = match params.get("append").map(String::as_str) {
            Some("true") => true,
            Some("false") | None => false,
            Some(other) => {
                return Err(ContractError::config_validation(
                    "params.append",
                    format!("invalid 'append' value '{other}'"),
                ))
            }
        };

        Ok(Self { path, append })
    }
}

/// Sink writing to a file on disk
pub type FileSink = WriterSink<BufWriter<File>>;

impl WriterSink<BufWriter<File>> {
    /// Create (or truncate) `path`, creating parent directories as needed
    #[instrument(name = "file_sink_open", skip(name, config), fields(path = %config.path.display()))]
    pub fn open(name: impl Into<String>, config: &FileSinkConfig) -> io::Result<Self> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(config.append)
            .truncate(!config.append)
            .open(&config.path)?;

        debug!(append = config.append, "FileSink opened");
        Ok(Self::new(name, BufWriter::new(file)))
    }

    /// Truncating file sink at `path`
    pub fn create(name: impl Into<String>, path: impl AsRef<Path>) -> io::Result<Self> {
        let config = FileSinkConfig {
            path: path.as_ref().to_path_buf(),
            append: false,
        };
        Self::open(name, &config)
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, DispatcherError> {
        let name = name.into();
        let config = FileSinkConfig::from_params(params)
            .map_err(|e| DispatcherError::sink_creation(&name, e))?;
        Self::open(name.as_str(), &config).map_err(|e| DispatcherError::sink_creation(name, e))
    }
}
