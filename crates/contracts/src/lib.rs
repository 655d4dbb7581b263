//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Channel model
//! - A transfer produces two independent byte streams: `Body` and `Header`
//! - Each stream is routed to exactly one `ByteSink` or `WriteCallback`
//! - Chunks are transient; sinks copy what they keep

mod blueprint;
mod channel;
mod error;
mod sink;
mod transfer;

pub use blueprint::*;
pub use channel::Channel;
pub use error::*;
pub use sink::*;
pub use transfer::*;
