//! The inbound MQTT v5 message envelope and the store's owned entry wrapper.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A process-unique 128-bit identifier assigned by an [`IdSource`](crate::IdSource)
/// on ingest. Never derived from message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u128);

impl MessageId {
    /// Wrap a raw 128-bit value.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// The raw 128-bit value.
    #[must_use]
    pub const fn raw(self) -> u128 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// MQTT quality-of-service level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Qos {
    /// At most once.
    AtMostOnce = 0,
    /// At least once.
    AtLeastOnce = 1,
    /// Exactly once.
    ExactlyOnce = 2,
}

impl TryFrom<u8> for Qos {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::AtMostOnce),
            1 => Ok(Self::AtLeastOnce),
            2 => Ok(Self::ExactlyOnce),
            other => Err(other),
        }
    }
}

/// MQTT v5 payload-format-indicator property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadFormatIndicator {
    /// Unspecified binary data.
    Binary,
    /// UTF-8 encoded payload.
    Utf8,
}

/// A single MQTT v5 user-property name/value pair. Duplicates are allowed
/// and order is preserved, per the protocol.
pub type UserProperty = (String, String);

/// An inbound MQTT v5 message, independent of transport.
///
/// Every optional field must round-trip through [`crate`](crate) consumers
/// untouched (eviction aside) — see spec §3/§6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Non-empty UTF-8 topic this message was published to.
    pub topic: String,
    /// Opaque payload bytes.
    pub payload: Vec<u8>,
    /// Requested quality of service.
    pub qos: Qos,
    /// Broker retain flag.
    pub retain: bool,
    /// Response-topic property, present on request messages.
    pub response_topic: Option<String>,
    /// Correlation-data property. Compared by value, never by identity.
    pub correlation_data: Option<Vec<u8>>,
    /// Content-type property.
    pub content_type: Option<String>,
    /// Message-expiry-interval property, in seconds.
    pub message_expiry_interval: Option<u32>,
    /// Payload-format-indicator property.
    pub payload_format_indicator: Option<PayloadFormatIndicator>,
    /// User-properties, in wire order, duplicates preserved.
    pub user_properties: Vec<UserProperty>,
}

impl Message {
    /// Byte length of the payload. This is the only quantity the
    /// per-topic eviction budget accounts for.
    #[must_use]
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    /// A message qualifies as a correlation-tracker request iff it carries
    /// both a response-topic and non-empty correlation-data (spec §4.5).
    #[must_use]
    pub fn is_correlation_request(&self) -> bool {
        self.response_topic.is_some()
            && self
                .correlation_data
                .as_ref()
                .is_some_and(|data| !data.is_empty())
    }
}

/// A [`Message`] as retained by the topic store: the message plus the
/// identifier and receipt timestamp the store assigns on ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferedEntry {
    /// Identifier assigned on ingest, unique within the owning store.
    pub id: MessageId,
    /// The message as received.
    pub message: Message,
    /// UTC instant the store accepted this entry.
    pub received_at: chrono::DateTime<chrono::Utc>,
}

impl BufferedEntry {
    /// Construct a new entry.
    #[must_use]
    pub fn new(id: MessageId, message: Message, received_at: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            id,
            message,
            received_at,
        }
    }

    /// Size in bytes counted against the owning topic's budget.
    #[must_use]
    pub fn size(&self) -> usize {
        self.message.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qos_round_trips_through_try_from() {
        assert_eq!(Qos::try_from(0), Ok(Qos::AtMostOnce));
        assert_eq!(Qos::try_from(2), Ok(Qos::ExactlyOnce));
        assert_eq!(Qos::try_from(3), Err(3));
    }

    #[test]
    fn message_id_displays_as_lowercase_hex() {
        let id = MessageId::new(0xdead_beef);
        assert_eq!(format!("{id}"), "000000000000000000000000deadbeef");
    }

    #[test]
    fn correlation_request_requires_both_fields() {
        let mut m = Message {
            topic: "req/a".into(),
            payload: vec![],
            qos: Qos::AtMostOnce,
            retain: false,
            response_topic: None,
            correlation_data: None,
            content_type: None,
            message_expiry_interval: None,
            payload_format_indicator: None,
            user_properties: vec![],
        };
        assert!(!m.is_correlation_request());
        m.response_topic = Some("res/a".into());
        assert!(!m.is_correlation_request());
        m.correlation_data = Some(vec![]);
        assert!(!m.is_correlation_request());
        m.correlation_data = Some(vec![0xca, 0xfe]);
        assert!(m.is_correlation_request());
    }
}
