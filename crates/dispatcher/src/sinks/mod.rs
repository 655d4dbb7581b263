//! Sink implementations
//!
//! Contains BufferSink, WriterSink/FileSink, LogSink and DiscardSink, plus
//! the factory that builds them from configuration.

mod buffer;
mod configured;
mod discard;
mod log;
mod writer;

pub use self::buffer::BufferSink;
pub use self::configured::{create_sink, ConfiguredSink};
pub use self::discard::DiscardSink;
pub use self::log::LogSink;
pub use self::writer::{FileSink, FileSinkConfig, WriterSink};
