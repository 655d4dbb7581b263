//! RoutingBlueprint - Config Loader output
//!
//! Describes which sinks a caller registers for each channel, the process
//! defaults, and transfer settings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::Channel;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete routing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Transfer settings
    #[serde(default)]
    pub transfer: TransferSettings,

    /// Body channel option slots
    #[serde(default)]
    pub body: ChannelRouting,

    /// Header channel option slots
    #[serde(default)]
    pub header: ChannelRouting,

    /// Sinks used when a channel resolves to its default
    #[serde(default)]
    pub defaults: DefaultRouting,
}

impl RoutingBlueprint {
    /// Option slots for a channel
    pub fn channel(&self, channel: Channel) -> &ChannelRouting {
        match channel {
            Channel::Body => &self.body,
            Channel::Header => &self.header,
        }
    }

    /// Every configured sink with a label describing where it sits
    pub fn sinks(&self) -> Vec<(String, &SinkConfig)> {
        let mut out = Vec::new();
        for channel in Channel::ALL {
            let routing = self.channel(channel);
            if let Some(cb) = &routing.callback {
                out.push((format!("{channel}.callback"), cb));
            }
            if let Some(obj) = &routing.object {
                out.push((format!("{channel}.object"), obj));
            }
        }
        out.push(("defaults.body".to_string(), &self.defaults.body));
        out.push(("defaults.header".to_string(), &self.defaults.header));
        out
    }
}

/// Transfer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferSettings {
    /// Transfer name (used for logging)
    #[serde(default = "default_transfer_name")]
    pub name: String,

    /// Maximum body chunk size handed to a sink
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl TransferSettings {
    /// Largest accepted `chunk_size` (16 MiB)
    pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            name: default_transfer_name(),
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_transfer_name() -> String {
    "transfer".to_string()
}

fn default_chunk_size() -> usize {
    16 * 1024
}

/// The two option slots of one channel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelRouting {
    /// Sink registered through the callback slot
    #[serde(default)]
    pub callback: Option<SinkConfig>,

    /// Sink registered through the object slot
    #[serde(default)]
    pub object: Option<SinkConfig>,
}

/// Process default sinks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultRouting {
    #[serde(default = "default_body_sink")]
    pub body: SinkConfig,

    #[serde(default = "default_header_sink")]
    pub header: SinkConfig,
}

impl Default for DefaultRouting {
    fn default() -> Self {
        Self {
            body: default_body_sink(),
            header: default_header_sink(),
        }
    }
}

fn default_body_sink() -> SinkConfig {
    SinkConfig::new("stdout", SinkType::Stdout)
}

fn default_header_sink() -> SinkConfig {
    SinkConfig::new("discard", SinkType::Discard)
}

/// Sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl SinkConfig {
    /// Sink config without parameters
    pub fn new(name: impl Into<String>, sink_type: SinkType) -> Self {
        Self {
            name: name.into(),
            sink_type,
            params: HashMap::new(),
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Log chunk summaries
    Log,
    /// Write to a file
    File,
    /// Write to standard output
    Stdout,
    /// Drop everything
    Discard,
}
