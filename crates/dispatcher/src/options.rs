//! WriteOptions - per-handle output configuration
//!
//! Each channel has two option slots, one for a callback and one for an
//! object sink, plus an owned default sink. Setting a slot replaces only that
//! slot; which slot wins is decided when a transfer starts.

use std::fmt;

use contracts::{ByteSink, Channel, WriteCallback, WriteOutcome};
use tracing::debug;

use crate::sinks::{DiscardSink, WriterSink};

/// Which option slots of a channel are populated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotState {
    pub callback: bool,
    pub object: bool,
}

impl SlotState {
    /// Neither slot is set
    pub fn is_unset(&self) -> bool {
        !self.callback && !self.object
    }
}

#[derive(Default)]
struct SinkSlot<'a> {
    callback: Option<WriteCallback<'a>>,
    object: Option<&'a mut dyn ByteSink>,
}

impl SinkSlot<'_> {
    fn state(&self) -> SlotState {
        SlotState {
            callback: self.callback.is_some(),
            object: self.object.is_some(),
        }
    }
}

/// Output configuration owned by a client handle
///
/// Callbacks and object sinks are borrowed for `'a`: the caller keeps
/// ownership and the borrow checker keeps them alive for every transfer that
/// uses these options. A transfer borrows the options mutably, so they cannot
/// change while it runs.
pub struct WriteOptions<'a> {
    body: SinkSlot<'a>,
    header: SinkSlot<'a>,
    body_default: Box<dyn ByteSink + 'a>,
    header_default: Box<dyn ByteSink + 'a>,
}

impl Default for WriteOptions<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> WriteOptions<'a> {
    /// Empty configuration: body defaults to stdout, header to discard
    pub fn new() -> Self {
        Self {
            body: SinkSlot::default(),
            header: SinkSlot::default(),
            body_default: Box::new(WriterSink::stdout()),
            header_default: Box::new(DiscardSink::new("header_default")),
        }
    }

    /// Register a callback for a channel
    pub fn set_callback<F>(&mut self, channel: Channel, callback: F)
    where
        F: FnMut(&[u8]) -> WriteOutcome + 'a,
    {
        debug!(channel = %channel, "Callback sink set");
        self.slot_mut(channel).callback = Some(Box::new(callback));
    }

    /// Register an object sink for a channel
    pub fn set_object_sink(&mut self, channel: Channel, sink: &'a mut dyn ByteSink) {
        debug!(channel = %channel, sink = sink.name(), "Object sink set");
        self.slot_mut(channel).object = Some(sink);
    }

    /// Clear both slots of a channel
    pub fn clear(&mut self, channel: Channel) {
        debug!(channel = %channel, "Channel cleared");
        *self.slot_mut(channel) = SinkSlot::default();
    }

    /// Clear only the callback slot
    pub fn clear_callback(&mut self, channel: Channel) {
        self.slot_mut(channel).callback = None;
    }

    /// Clear only the object slot
    pub fn clear_object_sink(&mut self, channel: Channel) {
        self.slot_mut(channel).object = None;
    }

    /// Replace the sink a channel falls back to when nothing applies
    pub fn set_default_sink(&mut self, channel: Channel, sink: Box<dyn ByteSink + 'a>) {
        match channel {
            Channel::Body => self.body_default = sink,
            Channel::Header => self.header_default = sink,
        }
    }

    /// Populated slots of a channel
    pub fn slot_state(&self, channel: Channel) -> SlotState {
        self.slot(channel).state()
    }

    pub fn set_body_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&[u8]) -> WriteOutcome + 'a,
    {
        self.set_callback(Channel::Body, callback);
    }

    pub fn set_body_object_sink(&mut self, sink: &'a mut dyn ByteSink) {
        self.set_object_sink(Channel::Body, sink);
    }

    pub fn set_header_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&[u8]) -> WriteOutcome + 'a,
    {
        self.set_callback(Channel::Header, callback);
    }

    pub fn set_header_object_sink(&mut self, sink: &'a mut dyn ByteSink) {
        self.set_object_sink(Channel::Header, sink);
    }

    pub fn clear_body(&mut self) {
        self.clear(Channel::Body);
    }

    pub fn clear_header(&mut self) {
        self.clear(Channel::Header);
    }

    fn slot(&self, channel: Channel) -> &SinkSlot<'a> {
        match channel {
            Channel::Body => &self.body,
            Channel::Header => &self.header,
        }
    }

    fn slot_mut(&mut self, channel: Channel) -> &mut SinkSlot<'a> {
        match channel {
            Channel::Body => &mut self.body,
            Channel::Header => &mut self.header,
        }
    }

    pub(crate) fn callback_mut(&mut self, channel: Channel) -> Option<&mut WriteCallback<'a>> {
        self.slot_mut(channel).callback.as_mut()
    }

    pub(crate) fn object_mut(&mut self, channel: Channel) -> Option<&mut (dyn ByteSink + 'a)> {
        match self.slot_mut(channel).object.as_mut() {
            Some(sink) => Some(&mut **sink),
            None => None,
        }
    }

    pub(crate) fn object_name(&self, channel: Channel) -> Option<&str> {
        self.slot(channel).object.as_ref().map(|s| s.name())
    }

    pub(crate) fn default_mut(&mut self, channel: Channel) -> &mut (dyn ByteSink + 'a) {
        match channel {
            Channel::Body => self.body_default.as_mut(),
            Channel::Header => self.header_default.as_mut(),
        }
    }

    pub(crate) fn default_name(&self, channel: Channel) -> &str {
        match channel {
            Channel::Body => self.body_default.name(),
            Channel::Header => self.header_default.name(),
        }
    }
}

impl fmt::Debug for WriteOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteOptions")
            .field("body", &self.body.state())
            .field("header", &self.header.state())
            .field("body_default", &self.body_default.name())
            .field("header_default", &self.header_default.name())
            .finish()
    }
}
