//! `IngestCoordinator` — thin dispatch from one inbound message to the
//! store, tree, and correlation tracker (spec §4.5). Holds no state of its
//! own beyond `Arc`s to the components it wires together.

use std::sync::Arc;
use std::time::Duration;

use mqtt_correlation::CorrelationTracker;
use mqtt_inspect_types::{IdSource, Message, MessageId};
use mqtt_topic_store::TopicIdPair;
use mqtt_topic_store::TopicStore;
use mqtt_topic_tree::TopicTree;

/// What, if anything, happened to the correlation tracker as a side effect
/// of ingesting this message (spec §4.5 step 4 — best-effort, failures are
/// swallowed but reported here for observability).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationAction {
    /// Neither a request nor a response — no correlation fields present.
    None,
    /// The message carried a response-topic and non-empty correlation-data;
    /// `registered` reports whether `register_request` accepted it.
    RegisteredRequest { registered: bool },
    /// The message carried correlation-data only; `linked` reports whether
    /// `link_response` found a matching pending request.
    LinkedResponse { linked: bool },
}

/// The full, already-applied effect of one `ingest` call — useful for
/// observability and demos; the coordinator itself keeps no history.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// The freshly assigned identifier for the inbound message.
    pub id: MessageId,
    /// Normalized topic the message was filed under.
    pub topic: String,
    /// Entries evicted from the store to make room for this message.
    pub evicted: Vec<TopicIdPair>,
    /// What happened on the correlation tracker, if anything.
    pub correlation_action: CorrelationAction,
}

/// Wires one inbound MQTT message into `TopicStore`, `TopicTree`, and
/// `CorrelationTracker` (spec §4.5). Pure dispatch: it owns no retained
/// state of its own.
pub struct IngestCoordinator {
    topic_store: Arc<TopicStore>,
    topic_tree: Arc<TopicTree>,
    correlation: Arc<CorrelationTracker>,
    ids: Arc<dyn IdSource>,
    correlation_ttl: Duration,
}

impl IngestCoordinator {
    /// Build a coordinator over already-constructed components.
    #[must_use]
    pub fn new(
        topic_store: Arc<TopicStore>,
        topic_tree: Arc<TopicTree>,
        correlation: Arc<CorrelationTracker>,
        ids: Arc<dyn IdSource>,
    ) -> Self {
        Self {
            topic_store,
            topic_tree,
            correlation,
            ids,
            correlation_ttl: CorrelationTracker::default_ttl(),
        }
    }

    /// Override the TTL used when registering correlation requests. Tests
    /// use this to exercise sweep behavior without waiting on the default.
    #[must_use]
    pub fn with_correlation_ttl(mut self, ttl: Duration) -> Self {
        self.correlation_ttl = ttl;
        self
    }

    /// Ingest one inbound message: assign it a fresh id, file it in the
    /// store, observe its topic in the tree, and apply the correlation
    /// side effect described in spec §4.5 step 4.
    pub fn ingest(&self, topic: &str, message: Message) -> IngestOutcome {
        let id = MessageId::new(self.ids.new_id());

        let batch_outcome = self
            .topic_store
            .add_batch(vec![(id, topic.to_string(), message.clone())]);

        self.topic_tree.observe(topic, 1);

        let correlation_action = if message.is_correlation_request() {
            let correlation_data = message
                .correlation_data
                .as_deref()
                .unwrap_or_default();
            let response_topic = message.response_topic.as_deref().unwrap_or_default();
            let registered =
                self.correlation
                    .register_request(id, correlation_data, response_topic, self.correlation_ttl);
            CorrelationAction::RegisteredRequest { registered }
        } else if message
            .correlation_data
            .as_ref()
            .is_some_and(|data| !data.is_empty())
        {
            let correlation_data = message.correlation_data.as_deref().unwrap_or_default();
            let linked = self.correlation.link_response(id, correlation_data, topic);
            CorrelationAction::LinkedResponse { linked }
        } else {
            CorrelationAction::None
        };

        IngestOutcome {
            id,
            topic: topic.to_string(),
            evicted: batch_outcome.evicted,
            correlation_action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mqtt_inspect_types::{PayloadFormatIndicator, Qos, SequentialIdSource};
    use mqtt_inspect_types::{ClockSource, FixedClock, Logger, TracingLogger};

    fn message(topic_payload: &[u8]) -> Message {
        Message {
            topic: "sensors/a".to_string(),
            payload: topic_payload.to_vec(),
            qos: Qos::AtMostOnce,
            retain: false,
            response_topic: None,
            correlation_data: None,
            content_type: None,
            message_expiry_interval: None,
            payload_format_indicator: Some(PayloadFormatIndicator::Utf8),
            user_properties: vec![],
        }
    }

    fn coordinator(clock: Arc<dyn ClockSource>) -> IngestCoordinator {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger);
        let ids: Arc<dyn IdSource> = Arc::new(SequentialIdSource::default());
        let store = Arc::new(TopicStore::new(1_000_000, clock.clone(), ids.clone(), logger.clone()));
        let tree = Arc::new(TopicTree::default());
        let correlation = Arc::new(CorrelationTracker::new(clock));
        IngestCoordinator::new(store, tree, correlation, ids)
    }

    #[test]
    fn ingest_with_no_correlation_fields_is_a_plain_file() {
        let clock: Arc<dyn ClockSource> = Arc::new(FixedClock::default());
        let coord = coordinator(clock);
        let outcome = coord.ingest("sensors/a", message(b"23.5"));
        assert_eq!(outcome.correlation_action, CorrelationAction::None);
        assert!(outcome.evicted.is_empty());
    }

    #[test]
    fn ingest_with_response_topic_and_correlation_data_registers_a_request() {
        let clock: Arc<dyn ClockSource> = Arc::new(FixedClock::default());
        let coord = coordinator(clock);
        let mut msg = message(b"ping");
        msg.response_topic = Some("replies/a".to_string());
        msg.correlation_data = Some(vec![0xca, 0xfe]);
        let outcome = coord.ingest("requests/a", msg);
        assert_eq!(outcome.correlation_action, CorrelationAction::RegisteredRequest { registered: true });
    }

    #[test]
    fn ingest_with_only_correlation_data_attempts_a_link() {
        let clock: Arc<dyn ClockSource> = Arc::new(FixedClock::default());
        let coord = coordinator(clock);
        let mut msg = message(b"ping");
        msg.response_topic = Some("replies/a".to_string());
        msg.correlation_data = Some(vec![0xca, 0xfe]);
        let _ = coord.ingest("requests/a", msg);

        let mut reply = message(b"pong");
        reply.correlation_data = Some(vec![0xca, 0xfe]);
        let outcome = coord.ingest("replies/a", reply);
        assert_eq!(outcome.correlation_action, CorrelationAction::LinkedResponse { linked: true });
    }
}
