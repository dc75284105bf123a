//! The per-topic bounded retention store (spec §4.1).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use mqtt_inspect_types::{BufferedEntry, ClockSource, IdSource, Logger, Message, MessageId};

use crate::buffer::TopicBuffer;

const PROXY_PAYLOAD: &str = "Payload too large for buffer";
const PREVIEW_MAX_CHARS: usize = 100;

/// Normalize a topic string per spec §4.1: trim a single trailing `/`,
/// reject empty results.
fn normalize_topic(topic: &str) -> Option<String> {
    let trimmed = topic.strip_suffix('/').unwrap_or(topic);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn preview_of(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.chars().take(PREVIEW_MAX_CHARS).collect(),
        Err(_) => "[Binary or non-UTF8 Payload]".to_string(),
    }
}

fn build_proxy(original: &Message, original_size: usize, now: chrono::DateTime<chrono::Utc>) -> Message {
    let mut user_properties = vec![
        ("CrowProxy".to_string(), "PayloadTooLarge".to_string()),
        ("OriginalPayloadSize".to_string(), original_size.to_string()),
        ("ReceivedTime".to_string(), now.to_rfc3339()),
        ("Preview".to_string(), preview_of(&original.payload)),
    ];
    user_properties.extend(original.user_properties.iter().cloned());

    Message {
        topic: original.topic.clone(),
        payload: PROXY_PAYLOAD.as_bytes().to_vec(),
        qos: original.qos,
        retain: original.retain,
        response_topic: original.response_topic.clone(),
        correlation_data: original.correlation_data.clone(),
        content_type: original.content_type.clone(),
        message_expiry_interval: original.message_expiry_interval,
        payload_format_indicator: original.payload_format_indicator,
        user_properties,
    }
}

/// One `(topic, id)` change reported by `add_batch`.
pub type TopicIdPair = (MessageId, String);

/// Result of an `add_batch` call: what was added, and what was evicted to
/// make room for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Entries added, in the order they were accepted.
    pub added: Vec<TopicIdPair>,
    /// Entries evicted to make room, in eviction order.
    pub evicted: Vec<TopicIdPair>,
}

/// Read-only occupancy snapshot across every topic, for a status line or
/// other ambient introspection — not part of spec.md's core contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopicStoreStats {
    /// Number of topics currently holding at least one entry.
    pub topic_count: usize,
    /// Cumulative payload bytes held across every topic.
    pub total_bytes: usize,
    /// Total entries held across every topic.
    pub entry_count: usize,
}

/// Per-topic byte-bounded FIFO retention store (spec §4.1).
///
/// Cross-topic isolation is the central invariant: a chatty topic can never
/// evict an entry belonging to another topic.
pub struct TopicStore {
    buffers: RwLock<HashMap<String, TopicBuffer>>,
    reverse_index: RwLock<HashMap<MessageId, String>>,
    default_budget: usize,
    overrides: RwLock<HashMap<String, usize>>,
    clock: Arc<dyn ClockSource>,
    ids: Arc<dyn IdSource>,
    logger: Arc<dyn Logger>,
}

impl TopicStore {
    /// Create a store with the given default per-topic budget.
    #[must_use]
    pub fn new(
        default_budget: usize,
        clock: Arc<dyn ClockSource>,
        ids: Arc<dyn IdSource>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            buffers: RwLock::new(HashMap::new()),
            reverse_index: RwLock::new(HashMap::new()),
            default_budget,
            overrides: RwLock::new(HashMap::new()),
            clock,
            ids,
            logger,
        }
    }

    /// Set or replace the byte-budget override for an exact topic filter.
    pub fn set_budget_override(&self, topic_filter: impl Into<String>, max_bytes: usize) {
        self.overrides
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(topic_filter.into(), max_bytes);
    }

    fn budget_for(&self, topic: &str) -> usize {
        self.overrides
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(topic)
            .copied()
            .unwrap_or(self.default_budget)
    }

    /// Accept a batch of `(id, topic, message)` triples. Items are
    /// processed in input order; within a topic that preserves the exact
    /// arrival order spec §4.1 requires. Returns what was added and what
    /// was evicted to make room.
    pub fn add_batch(&self, items: Vec<(MessageId, String, Message)>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for (id, raw_topic, message) in items {
            let Some(topic) = normalize_topic(&raw_topic) else {
                self.logger.warn(&format!("rejecting empty topic for id {id}"));
                continue;
            };

            {
                let reverse = self
                    .reverse_index
                    .read()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                if reverse.contains_key(&id) {
                    self.logger
                        .warn(&format!("duplicate id {id} ignored on topic {topic}"));
                    continue;
                }
            }

            let budget = self.budget_for(&topic);
            let size = message.size();
            let received_at = self.clock.now_utc();

            let mut buffers = self
                .buffers
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let buffer = buffers.entry(topic.clone()).or_insert_with(|| TopicBuffer::new(budget));

            let evicted = buffer.make_room_for(size);
            let mut reverse = self
                .reverse_index
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            for e in evicted {
                reverse.remove(&e.id);
                outcome.evicted.push((e.id, topic.clone()));
            }

            if buffer.fits(size) {
                let entry = BufferedEntry::new(id, message, received_at);
                buffer.push(entry);
                reverse.insert(id, topic.clone());
                outcome.added.push((id, topic));
                continue;
            }

            // `make_room_for` only stops while non-empty once `fits` holds,
            // which is handled above — reaching here means the buffer is
            // empty and the message alone still exceeds the budget.
            self.logger.warn(&format!(
                "message for topic {topic} ({size} bytes) exceeds budget {budget}; substituting proxy"
            ));
            let proxy_message = build_proxy(&message, size, received_at);
            let proxy_size = proxy_message.size();
            if !buffer.fits(proxy_size) {
                self.logger
                    .warn(&format!("proxy for topic {topic} still exceeds budget {budget}; dropping"));
                continue;
            }
            let proxy_id = MessageId::new(self.ids.new_id());
            let proxy_entry = BufferedEntry::new(proxy_id, proxy_message, received_at);
            buffer.push(proxy_entry);
            reverse.insert(proxy_id, topic.clone());
            outcome.added.push((proxy_id, topic));
        }

        outcome
    }

    /// Snapshot of entries for `topic`, in strict insertion order. Unknown
    /// topics yield an empty sequence, not an error.
    #[must_use]
    pub fn messages_for(&self, topic: &str) -> Vec<BufferedEntry> {
        let Some(topic) = normalize_topic(topic) else {
            return Vec::new();
        };
        self.buffers
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&topic)
            .map(TopicBuffer::snapshot)
            .unwrap_or_default()
    }

    /// Look up the topic and message for a given identifier.
    #[must_use]
    pub fn lookup(&self, id: MessageId) -> Option<(String, Message)> {
        let topic = self
            .reverse_index
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&id)
            .cloned()?;
        let buffers = self
            .buffers
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = buffers
            .get(&topic)?
            .snapshot()
            .into_iter()
            .find(|e| e.id == id)?;
        Some((topic, entry.message))
    }

    /// Topics currently holding at least one entry.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        self.buffers
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|(_, b)| !b.is_empty())
            .map(|(t, _)| t.clone())
            .collect()
    }

    /// Read-only occupancy snapshot across every topic.
    #[must_use]
    pub fn stats(&self) -> TopicStoreStats {
        let buffers = self
            .buffers
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut stats = TopicStoreStats::default();
        for buffer in buffers.values() {
            if buffer.is_empty() {
                continue;
            }
            stats.topic_count += 1;
            stats.total_bytes += buffer.current_bytes();
            stats.entry_count += buffer.len();
        }
        stats
    }

    /// Empty every buffer and the reverse index. Does not report evictions.
    pub fn clear_all(&self) {
        self.buffers
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
        self.reverse_index
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }
}
