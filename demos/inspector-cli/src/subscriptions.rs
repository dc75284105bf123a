//! Demo-only `SubscriptionOracle`: no real broker to ask, so a topic counts
//! as subscribed once the session has observed at least one message on it.

use std::collections::HashSet;
use std::sync::Mutex;

use mqtt_inspect_types::SubscriptionOracle;

#[derive(Debug, Default)]
pub struct ObservedTopicSubscriptions {
    topics: Mutex<HashSet<String>>,
}

impl ObservedTopicSubscriptions {
    pub fn mark_subscribed(&self, topic: &str) {
        self.topics
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(topic.to_string());
    }
}

impl SubscriptionOracle for ObservedTopicSubscriptions {
    fn is_subscribed(&self, topic: &str) -> bool {
        self.topics
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(topic)
    }
}
