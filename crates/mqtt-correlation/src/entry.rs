//! Correlation entry value type and tracker-observable status.

use chrono::{DateTime, Utc};
use mqtt_inspect_types::MessageId;

/// Status the tracker itself can emit. `NavigationDisabled` is reported by
/// an adjacent policy (spec §4.6) — the tracker never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No entry exists (or never existed) for this request.
    Hidden,
    /// Registered, awaiting a response.
    Pending,
    /// At least one response has been linked.
    Received,
}

/// A registered request awaiting (or having received) a response.
#[derive(Debug, Clone)]
pub struct CorrelationEntry {
    /// Correlation-data bytes — the map key, duplicated here for snapshots.
    pub correlation_data: Vec<u8>,
    /// Identifier of the request message that registered this entry.
    pub request_id: MessageId,
    /// Topic the response is expected on.
    pub response_topic: String,
    /// Instant this entry was created.
    pub created_at: DateTime<Utc>,
    /// Instant after which this entry is considered hidden and eligible
    /// for sweeping.
    pub expires_at: DateTime<Utc>,
    /// Identifiers of every response linked so far, in arrival order.
    pub responses: Vec<MessageId>,
    /// Current tracker-observable status.
    pub status: Status,
}

impl CorrelationEntry {
    /// Whether `now` is at or past this entry's expiry.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// A status transition the tracker emits on its event channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChanged {
    /// The request this transition applies to.
    pub request_id: MessageId,
    /// Correlation-data identifying the entry.
    pub correlation_data: Vec<u8>,
    /// Status before the transition.
    pub from: Status,
    /// Status after the transition.
    pub to: Status,
}
