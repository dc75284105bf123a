//! Synthetic ingest feed: stands in for a real broker subscription so the
//! engine crates can be exercised end to end. Runs as its own `tokio` task
//! and hands inbound messages to the ingest task over an `mpsc` channel —
//! the two-task split spec §5 describes for the ingest and command sides.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use mqtt_inspect_types::{Message, PayloadFormatIndicator, Qos};

use crate::subscriptions::ObservedTopicSubscriptions;

/// One inbound message, topic-qualified, as it would arrive from a broker
/// subscription.
#[derive(Debug, Clone)]
pub struct IngestEvent {
    pub topic: String,
    pub message: Message,
}

const SENSOR_TOPICS: &[&str] = &[
    "sensors/kitchen/temperature",
    "sensors/kitchen/humidity",
    "sensors/bedroom/temperature",
    "sensors/garage/door",
];

fn plain_reading(topic: &str, value: String) -> Message {
    Message {
        topic: topic.to_string(),
        payload: value.into_bytes(),
        qos: Qos::AtMostOnce,
        retain: false,
        response_topic: None,
        correlation_data: None,
        content_type: Some("text/plain".to_string()),
        message_expiry_interval: None,
        payload_format_indicator: Some(PayloadFormatIndicator::Utf8),
        user_properties: vec![],
    }
}

/// Generate one sensor reading and, roughly every tenth tick, an
/// MQTT v5 request/response pair so the correlation tracker sees traffic.
async fn tick(tx: &mpsc::Sender<IngestEvent>, subscriptions: &ObservedTopicSubscriptions, counter: u64) {
    let mut rng = rand::thread_rng();
    let topic = SENSOR_TOPICS[(counter as usize) % SENSOR_TOPICS.len()];
    subscriptions.mark_subscribed(topic);
    let reading = format!("{:.1}", rng.gen_range(15.0..30.0));
    let _ = tx
        .send(IngestEvent {
            topic: topic.to_string(),
            message: plain_reading(topic, reading),
        })
        .await;

    if counter % 10 == 9 {
        let request_topic = "devices/thermostat/cmd";
        let response_topic = "devices/thermostat/cmd/response";
        let correlation_data = counter.to_be_bytes().to_vec();
        subscriptions.mark_subscribed(response_topic);

        let request = Message {
            topic: request_topic.to_string(),
            payload: b"get-status".to_vec(),
            qos: Qos::AtLeastOnce,
            retain: false,
            response_topic: Some(response_topic.to_string()),
            correlation_data: Some(correlation_data.clone()),
            content_type: None,
            message_expiry_interval: Some(60),
            payload_format_indicator: Some(PayloadFormatIndicator::Utf8),
            user_properties: vec![],
        };
        let _ = tx
            .send(IngestEvent {
                topic: request_topic.to_string(),
                message: request,
            })
            .await;

        let response = Message {
            topic: response_topic.to_string(),
            payload: b"status-ok".to_vec(),
            qos: Qos::AtLeastOnce,
            retain: false,
            response_topic: None,
            correlation_data: Some(correlation_data),
            content_type: None,
            message_expiry_interval: None,
            payload_format_indicator: Some(PayloadFormatIndicator::Utf8),
            user_properties: vec![],
        };
        let _ = tx
            .send(IngestEvent {
                topic: response_topic.to_string(),
                message: response,
            })
            .await;
    }
}

/// Run the synthetic feed until `cancellation` fires. A zero `interval`
/// disables the feed — the task exits immediately.
pub async fn run(
    tx: mpsc::Sender<IngestEvent>,
    interval: Duration,
    subscriptions: Arc<ObservedTopicSubscriptions>,
    paused: Arc<AtomicBool>,
    cancellation: CancellationToken,
) {
    if interval.is_zero() {
        return;
    }
    let mut ticker = tokio::time::interval(interval);
    let mut counter = 0u64;
    loop {
        tokio::select! {
            () = cancellation.cancelled() => break,
            _ = ticker.tick() => {
                if paused.load(Ordering::Relaxed) {
                    continue;
                }
                tick(&tx, &subscriptions, counter).await;
                counter = counter.wrapping_add(1);
            }
        }
    }
}
