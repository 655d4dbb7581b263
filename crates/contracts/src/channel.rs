//! Channel tag for the two output streams of a transfer

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two independent byte streams produced during a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Response body
    Body,
    /// Response header lines
    Header,
}

impl Channel {
    /// Both channels, body first
    pub const ALL: [Channel; 2] = [Channel::Body, Channel::Header];

    /// Lowercase name used in logs and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Body => "body",
            Channel::Header => "header",
        }
    }

    /// The other channel
    pub fn other(&self) -> Channel {
        match self {
            Channel::Body => Channel::Header,
            Channel::Header => Channel::Body,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
