//! Bulk export file formats (spec §6): a JSON array of DTOs, or a UTF-8
//! text blob with messages delimited by an 80-character run of `=`.

use serde::{Deserialize, Serialize};

use crate::message::BufferedEntry;

/// Export file format selected by `Settings::export_format` or the
/// `:export` command's explicit argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// JSON array of message DTOs.
    Json,
    /// `=`-delimited UTF-8 text blob.
    Txt,
}

impl ExportFormat {
    /// Parse a format name case-insensitively, as the `:export` command
    /// grammar requires.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }
}

/// The JSON-serializable shape of one exported message. Binary/non-UTF-8
/// payloads are omitted from `payload_text` (spec §6) and reported only
/// via `payload_len`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedMessageDto {
    /// Hex identifier of the originating entry.
    pub id: String,
    /// Topic the message was published to.
    pub topic: String,
    /// UTF-8 payload text, if the payload is valid UTF-8.
    pub payload_text: Option<String>,
    /// Payload length in bytes, always present.
    pub payload_len: usize,
    /// Quality of service, as its wire value.
    pub qos: u8,
    /// Retain flag.
    pub retain: bool,
    /// Response-topic property, if present.
    pub response_topic: Option<String>,
    /// Correlation-data, hex-encoded, if present.
    pub correlation_data_hex: Option<String>,
    /// Content-type property, if present.
    pub content_type: Option<String>,
    /// Message-expiry-interval property, if present.
    pub message_expiry_interval: Option<u32>,
    /// User-properties, in wire order.
    pub user_properties: Vec<(String, String)>,
    /// Receipt timestamp, ISO-8601 UTC.
    pub received_at: String,
}

fn to_dto(entry: &BufferedEntry) -> ExportedMessageDto {
    let m = &entry.message;
    ExportedMessageDto {
        id: entry.id.to_string(),
        topic: m.topic.clone(),
        payload_text: String::from_utf8(m.payload.clone()).ok(),
        payload_len: m.payload.len(),
        qos: m.qos as u8,
        retain: m.retain,
        response_topic: m.response_topic.clone(),
        correlation_data_hex: m.correlation_data.as_ref().map(hex_encode),
        content_type: m.content_type.clone(),
        message_expiry_interval: m.message_expiry_interval,
        user_properties: m.user_properties.clone(),
        received_at: entry.received_at.to_rfc3339(),
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Render entries as a JSON array of DTOs.
///
/// # Errors
///
/// Returns a serialization error if, somehow, the DTOs cannot be encoded.
pub fn export_json(entries: &[BufferedEntry]) -> Result<String, serde_json::Error> {
    let dtos: Vec<ExportedMessageDto> = entries.iter().map(to_dto).collect();
    serde_json::to_string_pretty(&dtos)
}

const TEXT_DELIMITER_WIDTH: usize = 80;

/// Render entries as a UTF-8 text blob, messages separated by an
/// 80-character run of `=`. Non-UTF-8 payloads render as
/// `[Binary Data: N bytes]`.
#[must_use]
pub fn export_text(entries: &[BufferedEntry]) -> String {
    let delimiter = "=".repeat(TEXT_DELIMITER_WIDTH);
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(&delimiter);
            out.push('\n');
        }
        let m = &entry.message;
        out.push_str(&format!("topic: {}\n", m.topic));
        out.push_str(&format!("id: {}\n", entry.id));
        out.push_str(&format!("received_at: {}\n", entry.received_at.to_rfc3339()));
        out.push_str(&format!("qos: {}\n", m.qos as u8));
        out.push_str(&format!("retain: {}\n", m.retain));
        if let Some(rt) = &m.response_topic {
            out.push_str(&format!("response_topic: {rt}\n"));
        }
        if let Some(cd) = &m.correlation_data {
            out.push_str(&format!("correlation_data: {}\n", hex_encode(cd)));
        }
        if let Some(ct) = &m.content_type {
            out.push_str(&format!("content_type: {ct}\n"));
        }
        for (k, v) in &m.user_properties {
            out.push_str(&format!("property: {k}={v}\n"));
        }
        out.push_str("payload: ");
        match std::str::from_utf8(&m.payload) {
            Ok(text) => out.push_str(text),
            Err(_) => out.push_str(&format!("[Binary Data: {} bytes]", m.payload.len())),
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Message, MessageId, Qos};
    use chrono::Utc;

    fn sample_entry(payload: Vec<u8>) -> BufferedEntry {
        BufferedEntry::new(
            MessageId::new(1),
            Message {
                topic: "a/b".into(),
                payload,
                qos: Qos::AtLeastOnce,
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
    fn export_format_parses_case_insensitively() {
        assert_eq!(ExportFormat::parse("JSON"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse("txt"), Some(ExportFormat::Txt));
        assert_eq!(ExportFormat::parse("xml"), None);
    }

    #[test]
    fn text_export_delimits_with_80_equals() {
        let entries = vec![sample_entry(b"hello".to_vec()), sample_entry(b"world".to_vec())];
        let text = export_text(&entries);
        assert!(text.contains(&"=".repeat(80)));
    }

    #[test]
    fn text_export_marks_binary_payload() {
        let entries = vec![sample_entry(vec![0xff, 0xfe, 0x00, 0xff])];
        let text = export_text(&entries);
        assert!(text.contains("[Binary Data: 4 bytes]"));
    }

    #[test]
    fn json_export_round_trips_payload_text() {
        let entries = vec![sample_entry(b"hello".to_vec())];
        let json = export_json(&entries).expect("serialize");
        let dtos: Vec<ExportedMessageDto> = serde_json::from_str(&json).expect("parse");
        assert_eq!(dtos[0].payload_text.as_deref(), Some("hello"));
    }
}
