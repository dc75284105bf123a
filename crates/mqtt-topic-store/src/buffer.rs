//! A single topic's bounded FIFO retention buffer.

use std::collections::VecDeque;

use mqtt_inspect_types::BufferedEntry;

use crate::error::TopicStoreError;

/// FIFO sequence of entries for one topic, with a cached byte-sum kept
/// under `max_budget` at all observable times (spec §3 `TopicBuffer`
/// invariants).
#[derive(Debug)]
pub struct TopicBuffer {
    entries: VecDeque<BufferedEntry>,
    current_bytes: usize,
    max_budget: usize,
}

impl TopicBuffer {
    /// Create an empty buffer with the given positive byte budget.
    #[must_use]
    pub fn new(max_budget: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            current_bytes: 0,
            max_budget,
        }
    }

    /// The configured budget.
    #[must_use]
    pub fn max_budget(&self) -> usize {
        self.max_budget
    }

    /// Current cumulative payload bytes held.
    #[must_use]
    pub fn current_bytes(&self) -> usize {
        self.current_bytes
    }

    /// Number of entries currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True iff no entries are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the buffer in strict insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<BufferedEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Evict the oldest entry, if any. Returns it so the caller can report
    /// it and clean up the reverse index.
    pub fn evict_oldest(&mut self) -> Option<BufferedEntry> {
        let evicted = self.entries.pop_front()?;
        self.current_bytes = self.current_bytes.saturating_sub(evicted.size());
        Some(evicted)
    }

    /// Evict entries from the front until `entry` would fit the budget, or
    /// the buffer is empty. Returns the evicted entries in eviction order.
    pub fn make_room_for(&mut self, incoming_size: usize) -> Vec<BufferedEntry> {
        let mut evicted = Vec::new();
        while !self.entries.is_empty() && self.current_bytes + incoming_size > self.max_budget {
            if let Some(e) = self.evict_oldest() {
                evicted.push(e);
            } else {
                break;
            }
        }
        evicted
    }

    /// Whether `incoming_size` more bytes would still respect the budget
    /// given current occupancy.
    #[must_use]
    pub fn fits(&self, incoming_size: usize) -> bool {
        self.current_bytes + incoming_size <= self.max_budget
    }

    /// Append an entry that has already been confirmed to fit.
    ///
    /// # Panics
    ///
    /// Panics (a fatal bug per spec §7) if this would violate the budget
    /// invariant — callers must check [`Self::fits`] first.
    pub fn push(&mut self, entry: BufferedEntry) {
        let incoming_size = entry.size();
        assert!(
            self.fits(incoming_size),
            "{}",
            TopicStoreError::BudgetInvariantViolated {
                incoming_size,
                budget: self.max_budget,
                current_bytes: self.current_bytes,
            }
        );
        self.current_bytes += incoming_size;
        self.entries.push_back(entry);
    }

    /// Remove every entry, resetting the byte-sum to zero.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_bytes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mqtt_inspect_types::{Message, MessageId, Qos};

    fn entry(id: u128, size: usize) -> BufferedEntry {
        BufferedEntry::new(
            MessageId::new(id),
            Message {
                topic: "t".into(),
                payload: vec![0u8; size],
                qos: Qos::AtMostOnce,
                retain: false,
                response_topic: None,
                correlation_data: None,
                content_type: None,
                message_expiry_interval: None,
                payload_format_indicator: None,
                user_properties: vec![],
            },
            Utc::now(),
        )
    }

    #[test]
    fn make_room_evicts_oldest_first() {
        let mut buf = TopicBuffer::new(60);
        buf.push(entry(1, 30));
        buf.push(entry(2, 30));
        let evicted = buf.make_room_for(30);
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].id, MessageId::new(1));
        assert!(buf.fits(30));
        buf.push(entry(3, 30));
        assert_eq!(buf.current_bytes(), 60);
    }

    #[test]
    fn exact_budget_fit_is_retained() {
        let mut buf = TopicBuffer::new(30);
        assert!(buf.fits(30));
        buf.push(entry(1, 30));
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn clear_resets_byte_sum() {
        let mut buf = TopicBuffer::new(60);
        buf.push(entry(1, 30));
        buf.clear();
        assert_eq!(buf.current_bytes(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    #[should_panic(expected = "TopicBuffer invariant violated")]
    fn push_past_budget_without_making_room_panics() {
        let mut buf = TopicBuffer::new(30);
        buf.push(entry(1, 30));
        buf.push(entry(2, 10));
    }
}
