//! ConfiguredSink - sinks built from `SinkConfig`

use std::io;

use contracts::{ByteSink, ContractError, SinkConfig, SinkType, WriteOutcome};
use tracing::instrument;

use crate::error::DispatcherError;
use crate::sinks::{DiscardSink, FileSink, LogSink, WriterSink};

/// Any sink that can be described in a configuration file
pub enum ConfiguredSink {
    Log(LogSink),
    File(FileSink),
    Stdout(WriterSink<io::Stdout>),
    Discard(DiscardSink),
}

impl ConfiguredSink {
    fn inner(&self) -> &dyn ByteSink {
        match self {
            Self::Log(s) => s,
            Self::File(s) => s,
            Self::Stdout(s) => s,
            Self::Discard(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ByteSink {
        match self {
            Self::Log(s) => s,
            Self::File(s) => s,
            Self::Stdout(s) => s,
            Self::Discard(s) => s,
        }
    }
}

impl ByteSink for ConfiguredSink {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn write(&mut self, chunk: &[u8]) -> WriteOutcome {
        self.inner_mut().write(chunk)
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        self.inner_mut().flush()
    }
}

/// Create a sink from configuration
#[instrument(
    name = "dispatcher_create_sink",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
pub fn create_sink(config: &SinkConfig) -> Result<ConfiguredSink, DispatcherError> {
    match config.sink_type {
        SinkType::Log => Ok(ConfiguredSink::Log(LogSink::new(&config.name))),
        SinkType::File => {
            let sink = FileSink::from_params(&config.name, &config.params)?;
            Ok(ConfiguredSink::File(sink))
        }
        SinkType::Stdout => Ok(ConfiguredSink::Stdout(WriterSink::new(
            &config.name,
            io::stdout(),
        ))),
        SinkType::Discard => Ok(ConfiguredSink::Discard(DiscardSink::new(&config.name))),
    }
}
