//! Channel selector - decides which slot receives each channel's bytes
//!
//! Rules, evaluated per channel when a transfer starts:
//! 1. a callback wins over an object sink, whatever order they were set in
//! 2. otherwise the object sink
//! 3. a header channel with nothing set borrows the body's object sink
//!    (never the body's callback)
//! 4. otherwise the channel default

use std::fmt;

use contracts::Channel;
use serde::Serialize;

use crate::options::{SlotState, WriteOptions};

/// Slot that will receive a channel's bytes
///
/// The inner channel names whose slot is used; it differs from the routed
/// channel only for the header-to-body fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "slot", rename_all = "snake_case")]
pub enum Route {
    Callback(Channel),
    Object(Channel),
    Default(Channel),
}

impl Route {
    /// Channel that owns the slot
    pub fn slot_channel(&self) -> Channel {
        match self {
            Route::Callback(c) | Route::Object(c) | Route::Default(c) => *c,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Route::Callback(_) => "callback",
            Route::Object(_) => "object",
            Route::Default(_) => "default",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.slot_channel(), self.kind())
    }
}

/// Per-transfer routing snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedRouting {
    pub body: Route,
    pub header: Route,
}

impl ResolvedRouting {
    pub fn route(&self, channel: Channel) -> Route {
        match channel {
            Channel::Body => self.body,
            Channel::Header => self.header,
        }
    }

    /// True when both channels write into the same slot
    pub fn is_shared(&self) -> bool {
        self.body == self.header
    }

    /// Distinct routes, body first
    pub fn distinct_routes(&self) -> Vec<Route> {
        if self.is_shared() {
            vec![self.body]
        } else {
            vec![self.body, self.header]
        }
    }
}

/// Resolve routing from slot states alone
pub fn resolve_slots(body: SlotState, header: SlotState) -> ResolvedRouting {
    let body_route = own_route(Channel::Body, body).unwrap_or(Route::Default(Channel::Body));

    let header_route = match own_route(Channel::Header, header) {
        Some(route) => route,
        None if body.object && !body.callback => Route::Object(Channel::Body),
        None => Route::Default(Channel::Header),
    };

    ResolvedRouting {
        body: body_route,
        header: header_route,
    }
}

/// Resolve routing for the current state of `options`
pub fn resolve(options: &WriteOptions<'_>) -> ResolvedRouting {
    resolve_slots(
        options.slot_state(Channel::Body),
        options.slot_state(Channel::Header),
    )
}

fn own_route(channel: Channel, state: SlotState) -> Option<Route> {
    if state.callback {
        Some(Route::Callback(channel))
    } else if state.object {
        Some(Route::Object(channel))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::WriteOutcome;

    use crate::sinks::BufferSink;

    const UNSET: SlotState = SlotState {
        callback: false,
        object: false,
    };
    const CALLBACK: SlotState = SlotState {
        callback: true,
        object: false,
    };
    const OBJECT: SlotState = SlotState {
        callback: false,
        object: true,
    };
    const BOTH: SlotState = SlotState {
        callback: true,
        object: true,
    };

    #[test]
    fn test_unset_falls_back_to_defaults() {
        let routing = resolve_slots(UNSET, UNSET);
        assert_eq!(routing.body, Route::Default(Channel::Body));
        assert_eq!(routing.header, Route::Default(Channel::Header));
    }

    #[test]
    fn test_callback_wins_over_object() {
        let routing = resolve_slots(BOTH, BOTH);
        assert_eq!(routing.body, Route::Callback(Channel::Body));
        assert_eq!(routing.header, Route::Callback(Channel::Header));
    }

    #[test]
    fn test_header_borrows_body_object() {
        let routing = resolve_slots(OBJECT, UNSET);
        assert_eq!(routing.header, Route::Object(Channel::Body));
        assert!(routing.is_shared());
        assert_eq!(routing.distinct_routes(), vec![Route::Object(Channel::Body)]);
    }

    #[test]
    fn test_header_never_borrows_body_callback() {
        assert_eq!(
            resolve_slots(CALLBACK, UNSET).header,
            Route::Default(Channel::Header)
        );
        // callback shadows the object sink on body, so no fallback either
        assert_eq!(
            resolve_slots(BOTH, UNSET).header,
            Route::Default(Channel::Header)
        );
    }

    #[test]
    fn test_header_own_slot_beats_fallback() {
        let routing = resolve_slots(OBJECT, OBJECT);
        assert_eq!(routing.header, Route::Object(Channel::Header));
        assert!(!routing.is_shared());
    }

    #[test]
    fn test_resolution_is_order_independent() {
        for channel in Channel::ALL {
            let mut object_first_sink = BufferSink::new("a");
            let mut options = WriteOptions::new();
            options.set_object_sink(channel, &mut object_first_sink);
            options.set_callback(channel, WriteOutcome::accept_all);
            let object_first = resolve(&options);

            let mut callback_first_sink = BufferSink::new("b");
            let mut options = WriteOptions::new();
            options.set_callback(channel, WriteOutcome::accept_all);
            options.set_object_sink(channel, &mut callback_first_sink);
            let callback_first = resolve(&options);

            assert_eq!(object_first, callback_first);
            assert_eq!(object_first.route(channel), Route::Callback(channel));
        }
    }

    #[test]
    fn test_route_display() {
        assert_eq!(Route::Object(Channel::Body).to_string(), "body.object");
        assert_eq!(Route::Default(Channel::Header).to_string(), "header.default");
    }
}
