//! `NavigationPolicy` (spec §4.6): the UI-visible status for a request-id,
//! layering "is the response topic currently subscribed" on top of the
//! tracker's own status. Small but testable — it owns no state beyond the
//! two collaborators it wraps.

use std::sync::Arc;

use mqtt_correlation::{CorrelationTracker, Status};
use mqtt_inspect_types::{MessageId, SubscriptionOracle};

/// The status a caller actually renders, after [`NavigationPolicy`] applies
/// its override. `NavigationDisabled` never comes out of
/// `CorrelationTracker` itself (spec §4.2) — only this policy produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleStatus {
    /// No entry exists (or it expired / was swept).
    Hidden,
    /// Registered, awaiting a response.
    Pending,
    /// A response has been linked and its topic is currently subscribed.
    Received,
    /// A response has been linked, but its topic is not currently
    /// subscribed — navigating to it would show nothing, so navigation is
    /// suppressed even though a response exists.
    NavigationDisabled,
}

/// Reports the UI-visible status for a request-id (spec §4.6):
///
/// - no tracker entry → `Hidden`.
/// - the response-topic isn't currently subscribed → `NavigationDisabled`
///   (overrides a tracker status of `Received`).
/// - otherwise, the tracker's own status.
pub struct NavigationPolicy {
    tracker: Arc<CorrelationTracker>,
    subscriptions: Arc<dyn SubscriptionOracle>,
}

impl NavigationPolicy {
    /// Build a policy over an already-constructed tracker and subscription
    /// oracle.
    #[must_use]
    pub fn new(tracker: Arc<CorrelationTracker>, subscriptions: Arc<dyn SubscriptionOracle>) -> Self {
        Self { tracker, subscriptions }
    }

    /// The UI-visible status for `request_id`.
    #[must_use]
    pub fn status_for(&self, request_id: MessageId) -> VisibleStatus {
        let status = self.tracker.status_of(request_id);
        if status == Status::Hidden {
            return VisibleStatus::Hidden;
        }

        let Some(response_topic) = self.tracker.response_topic_of(request_id) else {
            return VisibleStatus::Hidden;
        };
        if status == Status::Received && !self.subscriptions.is_subscribed(&response_topic) {
            return VisibleStatus::NavigationDisabled;
        }

        match status {
            Status::Pending => VisibleStatus::Pending,
            Status::Received => VisibleStatus::Received,
            Status::Hidden => VisibleStatus::Hidden,
        }
    }
}
