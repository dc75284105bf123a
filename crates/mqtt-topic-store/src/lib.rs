//! mqtt-topic-store: per-topic byte-budget bounded ring buffer retention.
//!
//! Cross-topic isolation is the whole point — a chatty topic must never
//! evict a rare message on another topic. Eviction pressure is always
//! local to the topic that caused it (spec §4.1).

mod buffer;
mod error;
mod store;

pub use buffer::TopicBuffer;
pub use error::TopicStoreError;
pub use store::{BatchOutcome, TopicIdPair, TopicStore, TopicStoreStats};
