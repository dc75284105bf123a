//! mqtt-inspect-types: shared data model for the MQTT v5 inspector engine.
//!
//! Every other crate in this workspace depends on this one for the
//! `Message`/`BufferedEntry` value types, the `Settings` record, and the
//! collaborator trait contracts injected into the core (clock, id source,
//! logger, subscription oracle, publisher, fuzzy matcher).

mod collaborators;
mod error;
mod export;
mod message;
mod settings;

pub use collaborators::{
    ClockSource, FixedClock, FuzzyMatcher, IdSource, Logger, MqttPublisher, SequentialIdSource,
    SubscriptionOracle, SystemClock, TracingLogger, UuidV4IdSource,
};
pub use error::PublishFailureKind;
pub use export::{export_json, export_text, ExportFormat};
pub use message::{BufferedEntry, Message, MessageId, PayloadFormatIndicator, Qos, UserProperty};
pub use settings::{AuthMode, Settings, TopicBufferLimit};
