//! # Dispatcher
//!
//! Periodic publication module.
//!
//! Responsibilities:
//! - Build the message list once at start
//! - Hand one message per tick to a `WireCodec` for an encode/decode round trip
//! - Stop the timer once every message has been sent

pub mod codec;
pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;

pub use codec::{codec_for, BincodeCodec, JsonCodec};
pub use contracts::{MessageFamily, WireCodec};
pub use dispatcher::{DispatchReport, DispatchState, Dispatcher, DispatcherConfig, TickOutcome};
pub use error::DispatcherError;
pub use handle::DispatchHandle;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
