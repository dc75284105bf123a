//! Bulk `:deletetopic` execution (spec §4.3/§5/§7): publish an empty
//! retained payload to every topic matching a `:deletetopic` pattern,
//! honoring a cancellation token and reporting partial progress.
//!
//! Parsing the command (and validating the pattern grammar) is
//! `mqtt-command`'s job; this module only executes an already-parsed,
//! already-validated pattern against the set of topics the session has
//! actually observed.

use mqtt_command::matches_topic_pattern;
use mqtt_inspect_types::{MqttPublisher, PublishFailureKind, Qos};
use tokio_util::sync::CancellationToken;

use crate::error::IngestError;

/// One topic's publish failure during a bulk delete, classified per spec
/// §7's `Transient` taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTopicFailure {
    /// The topic the failed publish targeted.
    pub topic: String,
    /// Classification of the failure.
    pub kind: PublishFailureKind,
    /// Whether a caller should retry this class of failure.
    pub retryable: bool,
}

/// Outcome of a bulk `:deletetopic` execution (spec §5's cancellation
/// contract: "partial progress is reported in the result").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteTopicReport {
    /// Topics successfully cleared.
    pub successful: Vec<String>,
    /// Topics that failed to clear, with their classified failure.
    pub failed: Vec<DeleteTopicFailure>,
    /// Whether the operation stopped early due to cancellation. When
    /// `true`, `successful` and `failed` still report everything completed
    /// before the cancellation was observed.
    pub cancelled: bool,
}

/// Publish an empty retained payload to every topic in `known_topics` that
/// matches `pattern` (spec §4.3's wildcard rule — `+` one level, trailing
/// `#` that level and below), stopping early if `cancellation` fires.
///
/// `pattern` is assumed already validated by
/// [`mqtt_command::is_valid_delete_pattern`]; an invalid pattern simply
/// matches nothing.
pub async fn delete_topic(
    pattern: &str,
    known_topics: &[String],
    publisher: &dyn MqttPublisher,
    cancellation: &CancellationToken,
) -> DeleteTopicReport {
    let mut result = DeleteTopicReport::default();

    for topic in known_topics.iter().filter(|t| matches_topic_pattern(pattern, t)) {
        if cancellation.is_cancelled() {
            result.cancelled = true;
            break;
        }
        match publisher.publish(topic, &[], true, Qos::AtMostOnce).await {
            Ok(()) => result.successful.push(topic.clone()),
            Err(kind) => result.failed.push(DeleteTopicFailure {
                topic: topic.clone(),
                retryable: kind.retryable(),
                kind,
            }),
        }
    }

    result
}

/// Run [`delete_topic`] behind the confirm-flag gate carried by
/// `ParsedCommand::DeleteTopic` (spec §4.3): destructive bulk publishes
/// never run unless the command was parsed with its confirm flag set.
pub async fn execute_confirmed_delete(
    pattern: &str,
    confirmed: bool,
    known_topics: &[String],
    publisher: &dyn MqttPublisher,
    cancellation: &CancellationToken,
) -> Result<DeleteTopicReport, IngestError> {
    if !confirmed {
        return Err(IngestError::ConfirmationRequired {
            pattern: pattern.to_string(),
        });
    }
    Ok(delete_topic(pattern, known_topics, publisher, cancellation).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakePublisher {
        published: Mutex<Vec<String>>,
        fail_on: Vec<String>,
    }

    impl FakePublisher {
        fn new(fail_on: Vec<String>) -> Self {
            Self {
                published: Mutex::new(Vec::new()),
                fail_on,
            }
        }
    }

    #[async_trait]
    impl MqttPublisher for FakePublisher {
        async fn publish(&self, topic: &str, _payload: &[u8], retain: bool, _qos: Qos) -> Result<(), PublishFailureKind> {
            assert!(retain, "deletetopic must publish with retain=true");
            if self.fail_on.iter().any(|t| t == topic) {
                return Err(PublishFailureKind::BrokerError);
            }
            self.published.lock().unwrap().push(topic.to_string());
            Ok(())
        }
    }

    fn topics() -> Vec<String> {
        vec![
            "sensors/kitchen/temp".to_string(),
            "sensors/kitchen/humidity".to_string(),
            "sensors/bedroom/temp".to_string(),
            "other/topic".to_string(),
        ]
    }

    #[tokio::test]
    async fn wildcard_pattern_clears_every_match() {
        let publisher = FakePublisher::new(vec![]);
        let result = delete_topic("sensors/+/temp", &topics(), &publisher, &CancellationToken::new()).await;
        assert_eq!(result.successful, vec!["sensors/kitchen/temp", "sensors/bedroom/temp"]);
        assert!(result.failed.is_empty());
        assert!(!result.cancelled);
    }

    #[tokio::test]
    async fn exact_pattern_clears_one_topic() {
        let publisher = FakePublisher::new(vec![]);
        let result = delete_topic("other/topic", &topics(), &publisher, &CancellationToken::new()).await;
        assert_eq!(result.successful, vec!["other/topic"]);
    }

    #[tokio::test]
    async fn publish_failures_are_classified_and_collected() {
        let publisher = FakePublisher::new(vec!["sensors/kitchen/humidity".to_string()]);
        let result = delete_topic("sensors/kitchen/#", &topics(), &publisher, &CancellationToken::new()).await;
        assert_eq!(result.successful, vec!["sensors/kitchen/temp"]);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].topic, "sensors/kitchen/humidity");
        assert_eq!(result.failed[0].kind, PublishFailureKind::BrokerError);
        assert!(!result.failed[0].retryable);
    }

    #[tokio::test]
    async fn pre_cancelled_token_stops_before_any_publish() {
        let publisher = FakePublisher::new(vec![]);
        let token = CancellationToken::new();
        token.cancel();
        let result = delete_topic("sensors/#", &topics(), &publisher, &token).await;
        assert!(result.cancelled);
        assert!(result.successful.is_empty());
    }

    #[tokio::test]
    async fn unconfirmed_delete_is_rejected_before_any_publish() {
        let publisher = FakePublisher::new(vec![]);
        let err = execute_confirmed_delete("sensors/#", false, &topics(), &publisher, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            IngestError::ConfirmationRequired {
                pattern: "sensors/#".to_string()
            }
        );
        assert!(publisher.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn confirmed_delete_delegates_to_delete_topic() {
        let publisher = FakePublisher::new(vec![]);
        let report = execute_confirmed_delete("other/topic", true, &topics(), &publisher, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(report.successful, vec!["other/topic"]);
    }
}
