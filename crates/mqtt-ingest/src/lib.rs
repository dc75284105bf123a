//! mqtt-ingest: thin dispatch wiring inbound MQTT v5 messages into the
//! topic store, topic tree, and correlation tracker (spec §4.5
//! `IngestCoordinator`), plus the bulk `:deletetopic` executor bound by the
//! concurrency contracts in spec §5.

mod delete_topic;
mod error;
mod ingest;
mod navigation_policy;

pub use delete_topic::{delete_topic, execute_confirmed_delete, DeleteTopicFailure, DeleteTopicReport};
pub use error::IngestError;
pub use ingest::{CorrelationAction, IngestCoordinator, IngestOutcome};
pub use navigation_policy::{NavigationPolicy, VisibleStatus};
