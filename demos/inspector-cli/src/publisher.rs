//! Demo-only `MqttPublisher`: there is no real broker connection in this
//! binary, so every publish "succeeds" after being logged. Exists purely so
//! `:deletetopic` has a collaborator to call (spec's publisher interface is
//! the actual broker client, which lives outside this engine's scope).

use async_trait::async_trait;

use mqtt_inspect_types::{MqttPublisher, PublishFailureKind, Qos};

#[derive(Debug, Default)]
pub struct LoggingPublisher;

#[async_trait]
impl MqttPublisher for LoggingPublisher {
    async fn publish(
        &self,
        topic: &str,
        payload: &[u8],
        retain: bool,
        qos: Qos,
    ) -> Result<(), PublishFailureKind> {
        tracing::info!(topic, payload_len = payload.len(), retain, qos = qos as u8, "publish (simulated)");
        Ok(())
    }
}
