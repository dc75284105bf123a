//! mqtt-correlation: MQTT v5 request/response correlation tracker.
//!
//! Indexes request messages by their correlation-data bytes, links
//! responses as they arrive, and ages entries out by TTL (spec §4.2).

mod entry;
mod error;
mod tracker;

pub use entry::{CorrelationEntry, Status, StatusChanged};
pub use error::CorrelationError;
pub use tracker::CorrelationTracker;
