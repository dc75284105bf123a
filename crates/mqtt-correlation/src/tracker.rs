//! The CorrelationTracker (spec §4.2): indexes requests by correlation-data,
//! links responses, and ages entries out by TTL.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use mqtt_inspect_types::{ClockSource, MessageId};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::entry::{CorrelationEntry, Status, StatusChanged};
use crate::error::CorrelationError;

const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// MQTT v5 correlation tracker (spec §4.2).
///
/// Storage is two concurrent maps kept mutually consistent: correlation-data
/// → entry, and request-id → correlation-data. Per-entry mutation goes
/// through `DashMap`'s own shard-local locking; no additional global lock
/// is introduced (see DESIGN.md).
pub struct CorrelationTracker {
    by_correlation: DashMap<Vec<u8>, CorrelationEntry>,
    by_request: DashMap<MessageId, Vec<u8>>,
    clock: Arc<dyn ClockSource>,
    events: broadcast::Sender<StatusChanged>,
}

impl CorrelationTracker {
    /// Create a tracker backed by the given clock source.
    #[must_use]
    pub fn new(clock: Arc<dyn ClockSource>) -> Self {
        let (events, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            by_correlation: DashMap::new(),
            by_request: DashMap::new(),
            clock,
            events,
        }
    }

    /// The default TTL used when callers don't specify one (30 minutes).
    #[must_use]
    pub fn default_ttl() -> Duration {
        DEFAULT_TTL
    }

    /// Subscribe to `StatusChanged` events. Same-subject events (same
    /// request-id) are totally ordered; events for unrelated requests carry
    /// no ordering guarantee relative to each other (spec §5/§9).
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StatusChanged> {
        self.events.subscribe()
    }

    fn emit(&self, request_id: MessageId, correlation_data: Vec<u8>, from: Status, to: Status) {
        let _ = self.events.send(StatusChanged {
            request_id,
            correlation_data,
            from,
            to,
        });
    }

    /// Register a request. Fails if either argument is empty/invalid, or an
    /// entry already exists for this correlation-data (spec §4.2).
    pub fn register_request(
        &self,
        request_id: MessageId,
        correlation_data: &[u8],
        response_topic: &str,
        ttl: Duration,
    ) -> bool {
        self.try_register_request(request_id, correlation_data, response_topic, ttl)
            .is_ok()
    }

    fn try_register_request(
        &self,
        request_id: MessageId,
        correlation_data: &[u8],
        response_topic: &str,
        ttl: Duration,
    ) -> Result<(), CorrelationError> {
        if correlation_data.is_empty() {
            return Err(CorrelationError::EmptyCorrelationData);
        }
        if response_topic.is_empty() {
            return Err(CorrelationError::EmptyResponseTopic);
        }

        let now = self.clock.now_utc();
        let chrono_ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());
        let entry = CorrelationEntry {
            correlation_data: correlation_data.to_vec(),
            request_id,
            response_topic: response_topic.to_string(),
            created_at: now,
            expires_at: now + chrono_ttl,
            responses: Vec::new(),
            status: Status::Pending,
        };

        use dashmap::mapref::entry::Entry;
        match self.by_correlation.entry(correlation_data.to_vec()) {
            Entry::Occupied(_) => return Err(CorrelationError::DuplicateCorrelationData),
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
        }

        self.by_request.insert(request_id, correlation_data.to_vec());
        self.emit(request_id, correlation_data.to_vec(), Status::Hidden, Status::Pending);
        Ok(())
    }

    /// Link a response. Fails if no entry exists for `correlation_data`, or
    /// `actual_topic` does not byte-exactly match the entry's expected
    /// response-topic (spec §4.2).
    pub fn link_response(&self, response_id: MessageId, correlation_data: &[u8], actual_topic: &str) -> bool {
        self.try_link_response(response_id, correlation_data, actual_topic).is_ok()
    }

    fn try_link_response(
        &self,
        response_id: MessageId,
        correlation_data: &[u8],
        actual_topic: &str,
    ) -> Result<(), CorrelationError> {
        let now = self.clock.now_utc();
        let Some(mut guard) = self.by_correlation.get_mut(correlation_data) else {
            return Err(CorrelationError::UnknownCorrelationData);
        };
        if guard.is_expired(now) {
            return Err(CorrelationError::Expired);
        }
        if guard.response_topic != actual_topic {
            return Err(CorrelationError::TopicMismatch {
                actual: actual_topic.to_string(),
                expected: guard.response_topic.clone(),
            });
        }

        guard.responses.push(response_id);
        if guard.status == Status::Pending {
            let request_id = guard.request_id;
            guard.status = Status::Received;
            drop(guard);
            self.emit(request_id, correlation_data.to_vec(), Status::Pending, Status::Received);
        }
        Ok(())
    }

    /// Current UI-visible tracker status for `request_id`. A `Pending`
    /// entry past its expiry reports `Hidden` without being removed here —
    /// removal happens in `sweep_expired`.
    #[must_use]
    pub fn status_of(&self, request_id: MessageId) -> Status {
        let Some(correlation_data) = self.by_request.get(&request_id).map(|r| r.clone()) else {
            return Status::Hidden;
        };
        let Some(entry) = self.by_correlation.get(&correlation_data) else {
            return Status::Hidden;
        };
        if entry.is_expired(self.clock.now_utc()) {
            Status::Hidden
        } else {
            entry.status
        }
    }

    /// Response identifiers linked so far, in arrival order.
    #[must_use]
    pub fn responses_of(&self, request_id: MessageId) -> Vec<MessageId> {
        let Some(correlation_data) = self.by_request.get(&request_id).map(|r| r.clone()) else {
            return Vec::new();
        };
        self.by_correlation
            .get(&correlation_data)
            .map(|e| e.responses.clone())
            .unwrap_or_default()
    }

    /// The response-topic a request is waiting on, if it is tracked.
    #[must_use]
    pub fn response_topic_of(&self, request_id: MessageId) -> Option<String> {
        let correlation_data = self.by_request.get(&request_id).map(|r| r.clone())?;
        self.by_correlation.get(&correlation_data).map(|e| e.response_topic.clone())
    }

    /// Remove every entry whose expiry has passed, emitting `StatusChanged`
    /// to `Hidden` for each. Idempotent and cancel-safe: a cancelled sweep
    /// (via `CancellationToken`) leaves state consistent, having already
    /// committed removals made before cancellation was observed.
    pub fn sweep_expired(&self, cancellation: &CancellationToken) -> usize {
        let now = self.clock.now_utc();
        let expired: Vec<Vec<u8>> = self
            .by_correlation
            .iter()
            .filter(|entry| entry.is_expired(now))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = 0usize;
        for key in expired {
            if cancellation.is_cancelled() {
                break;
            }
            if let Some((_, entry)) = self.by_correlation.remove(&key) {
                self.by_request.remove(&entry.request_id);
                self.emit(entry.request_id, key, entry.status, Status::Hidden);
                removed += 1;
            }
        }
        removed
    }

    /// Spawn a periodic sweeper on the current Tokio runtime. Dropping the
    /// returned handle, or cancelling `cancellation`, stops it.
    pub fn spawn_sweeper(
        self: Arc<Self>,
        interval: Duration,
        cancellation: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    () = cancellation.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = self.sweep_expired(&cancellation);
                        if removed > 0 {
                            tracing::debug!(removed, "swept expired correlation entries");
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mqtt_inspect_types::FixedClock;

    fn tracker() -> (CorrelationTracker, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(DateTime::<Utc>::MIN_UTC + chrono::Duration::days(1)));
        (CorrelationTracker::new(clock.clone()), clock)
    }

    #[test]
    fn happy_path_scenario_from_spec() {
        let (t, _clock) = tracker();
        let r1 = MessageId::new(1);
        assert!(t.register_request(r1, b"\xca\xfe", "res/a", Duration::from_secs(60)));
        assert_eq!(t.status_of(r1), Status::Pending);

        let s1 = MessageId::new(2);
        let s2 = MessageId::new(3);
        assert!(t.link_response(s1, b"\xca\xfe", "res/a"));
        assert_eq!(t.status_of(r1), Status::Received);
        assert!(t.link_response(s2, b"\xca\xfe", "res/a"));
        assert_eq!(t.responses_of(r1), vec![s1, s2]);
    }

    #[test]
    fn topic_mismatch_does_not_link() {
        let (t, _clock) = tracker();
        let r1 = MessageId::new(1);
        t.register_request(r1, b"\xca\xfe", "res/a", Duration::from_secs(60));
        let s1 = MessageId::new(2);
        assert!(!t.link_response(s1, b"\xca\xfe", "res/b"));
        assert_eq!(t.status_of(r1), Status::Pending);
        assert!(t.responses_of(r1).is_empty());
    }

    #[test]
    fn duplicate_correlation_data_registration_fails() {
        let (t, _clock) = tracker();
        let r1 = MessageId::new(1);
        let r2 = MessageId::new(2);
        assert!(t.register_request(r1, b"\xca\xfe", "res/a", Duration::from_secs(60)));
        assert!(!t.register_request(r2, b"\xca\xfe", "res/b", Duration::from_secs(60)));
    }

    #[test]
    fn ttl_sweep_hides_expired_entry() {
        let (t, clock) = tracker();
        let r1 = MessageId::new(1);
        t.register_request(r1, b"\xca\xfe", "res/a", Duration::from_secs(1));
        clock.advance(chrono::Duration::milliseconds(1100));

        assert_eq!(t.status_of(r1), Status::Hidden);
        let token = CancellationToken::new();
        assert_eq!(t.sweep_expired(&token), 1);
        assert_eq!(t.status_of(r1), Status::Hidden);
        assert!(t.responses_of(r1).is_empty());
    }

    #[test]
    fn register_rejects_empty_correlation_data() {
        let (t, _clock) = tracker();
        assert!(!t.register_request(MessageId::new(1), b"", "res/a", Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn events_are_observable_via_subscribe() {
        let (t, _clock) = tracker();
        let mut rx = t.subscribe();
        let r1 = MessageId::new(1);
        t.register_request(r1, b"\xca\xfe", "res/a", Duration::from_secs(60));
        let first = rx.recv().await.unwrap();
        assert_eq!(first.to, Status::Pending);

        t.link_response(MessageId::new(2), b"\xca\xfe", "res/a");
        let second = rx.recv().await.unwrap();
        assert_eq!(second.to, Status::Received);
    }
}
