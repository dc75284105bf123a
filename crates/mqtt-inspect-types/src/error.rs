//! Classification for `Transient` publisher failures (spec §7).

use serde::{Deserialize, Serialize};

/// Classification of a failed `MqttPublisher::publish` call, attached to
/// per-topic failures reported by `deletetopic` bulk operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublishFailureKind {
    /// The publish call did not complete before its deadline.
    Timeout,
    /// A transport-level failure (connection reset, DNS failure, ...).
    NetworkError,
    /// The broker rejected the publish with an error reason code.
    BrokerError,
    /// The broker rejected the publish as unauthorized.
    PermissionDenied,
    /// The topic string was rejected by the broker or publisher.
    InvalidTopic,
    /// A failure that does not fit the other classifications.
    Unknown,
}

impl PublishFailureKind {
    /// Whether a caller should retry this class of failure.
    #[must_use]
    pub fn retryable(self) -> bool {
        matches!(self, Self::Timeout | Self::NetworkError | Self::Unknown)
    }
}
