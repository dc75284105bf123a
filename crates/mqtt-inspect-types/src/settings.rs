//! Persisted settings record (spec §6). The core never mutates this in
//! place; commands that need to change a value hand back a new `Settings`
//! (or, for `setuser`/`setpass`/`setauth*`, a description of the field to
//! change — see `mqtt-command`).

use serde::{Deserialize, Serialize};

use crate::export::ExportFormat;

/// Authentication mode, as set by the `:setauthmode` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// No credentials.
    Anonymous,
    /// Username/password.
    UserPass,
    /// MQTT v5 enhanced authentication (method + data).
    Enhanced,
}

impl AuthMode {
    /// Parse an auth mode name case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "anonymous" => Some(Self::Anonymous),
            "userpass" => Some(Self::UserPass),
            "enhanced" => Some(Self::Enhanced),
            _ => None,
        }
    }
}

/// One entry in the per-topic-filter buffer budget override table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicBufferLimit {
    /// Exact topic filter this override applies to (no wildcard matching).
    pub topic_filter: String,
    /// Maximum cumulative payload bytes for this topic.
    pub max_bytes: usize,
}

/// The persisted settings record (spec §6). Passed by value/reference into
/// the command parser as an immutable snapshot — never a shared mutable
/// global (spec §9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Broker hostname.
    pub hostname: Option<String>,
    /// Broker port, 1..=65535.
    pub port: u16,
    /// Optional client identifier.
    pub client_id: Option<String>,
    /// Keep-alive interval, in seconds.
    pub keep_alive_secs: u16,
    /// MQTT v5 clean-session (actually clean-start) flag.
    pub clean_session: bool,
    /// Session-expiry-interval property, in seconds.
    pub session_expiry: Option<u32>,
    /// Whether to connect over TLS.
    pub use_tls: bool,
    /// Current authentication mode.
    pub auth_mode: AuthMode,
    /// Username, for `AuthMode::UserPass`.
    pub username: Option<String>,
    /// Password, for `AuthMode::UserPass`.
    pub password: Option<String>,
    /// Authentication method, for `AuthMode::Enhanced`.
    pub auth_method: Option<String>,
    /// Authentication data, for `AuthMode::Enhanced`.
    pub auth_data: Option<String>,
    /// Default bulk-export format.
    pub export_format: ExportFormat,
    /// Default bulk-export destination path.
    pub export_path: String,
    /// Per-topic-filter buffer budget overrides.
    pub topic_buffer_limits: Vec<TopicBufferLimit>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hostname: None,
            port: 1883,
            client_id: None,
            keep_alive_secs: 60,
            clean_session: true,
            session_expiry: None,
            use_tls: false,
            auth_mode: AuthMode::Anonymous,
            username: None,
            password: None,
            auth_method: None,
            auth_data: None,
            export_format: ExportFormat::Json,
            export_path: "export.json".to_string(),
            topic_buffer_limits: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_mode_parses_known_names() {
        assert_eq!(AuthMode::parse("Enhanced"), Some(AuthMode::Enhanced));
        assert_eq!(AuthMode::parse("bogus"), None);
    }

    #[test]
    fn default_settings_are_anonymous_with_no_host() {
        let s = Settings::default();
        assert_eq!(s.auth_mode, AuthMode::Anonymous);
        assert!(s.hostname.is_none());
        assert_eq!(s.port, 1883);
    }
}
