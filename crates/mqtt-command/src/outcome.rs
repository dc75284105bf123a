//! The typed outcome sum type and the `ParsedCommand` tagged enum (spec
//! §4.3's `{Command{kind,args}, SearchTerm, TopicSearch, Failure}`).

use mqtt_inspect_types::{AuthMode, ExportFormat};

/// Which topic(s) a bulk export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    /// The currently selected topic only.
    Selected,
    /// Every topic observed this session.
    All,
}

/// Payload view mode, selected with `:view`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Raw bytes.
    Raw,
    /// Pretty-printed JSON.
    Json,
    /// Rendered as an image.
    Image,
    /// Rendered as a video.
    Video,
    /// Hex dump.
    Hex,
}

impl ViewMode {
    /// Parse a view-mode name case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Some(Self::Raw),
            "json" => Some(Self::Json),
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "hex" => Some(Self::Hex),
            _ => None,
        }
    }
}

/// A fully resolved connection request — host/port/credentials have
/// already been disambiguated against the settings snapshot, so the
/// caller never needs to consult settings again.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectRequest {
    /// Broker hostname or dotted-quad address.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// Resolved username, if any.
    pub username: Option<String>,
    /// Resolved password, if any.
    pub password: Option<String>,
}

/// One recognized command, fully parsed and argument-validated against a
/// settings snapshot (spec §4.3). This replaces spec.md's generic
/// `Command{kind, args}` shape with a tagged enum — `kind` corresponds to
/// the variant tag, `args` to its typed fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCommand {
    /// `:connect [<host:port>] [<user>] [<pass>]`
    Connect(ConnectRequest),
    /// `:disconnect`
    Disconnect,
    /// `:export [<all>] [<format> <path>]`
    Export {
        /// Which topic(s) to export.
        scope: ExportScope,
        /// Export file format.
        format: ExportFormat,
        /// Destination path.
        path: String,
    },
    /// `:filter [<pattern>]`
    Filter {
        /// `None` clears the filter.
        pattern: Option<String>,
    },
    /// `:clear`
    Clear,
    /// `:help [<topic>]`
    Help {
        /// Optional help topic.
        topic: Option<String>,
    },
    /// `:pause`
    Pause,
    /// `:resume`
    Resume,
    /// `:copy`
    Copy,
    /// `:expand`
    Expand,
    /// `:collapse`
    Collapse,
    /// `:settings`
    Settings,
    /// `:search [<term>]`
    Search {
        /// `None` repeats/clears the active search term, depending on caller.
        term: Option<String>,
    },
    /// `:view <mode>`
    View {
        /// Requested payload view mode.
        mode: ViewMode,
    },
    /// `:setuser <name>`
    SetUser {
        /// New username.
        value: String,
    },
    /// `:setpass <pass>`
    SetPass {
        /// New password.
        value: String,
    },
    /// `:setauthmode <mode>`
    SetAuthMode {
        /// New authentication mode.
        mode: AuthMode,
    },
    /// `:setauthmethod <method>`
    SetAuthMethod {
        /// New enhanced-auth method name.
        value: String,
    },
    /// `:setauthdata <data>`
    SetAuthData {
        /// New enhanced-auth data blob.
        value: String,
    },
    /// `:setusetls <bool>`
    SetUseTls {
        /// New TLS toggle.
        value: bool,
    },
    /// `:deletetopic <pattern> [confirm]`
    DeleteTopic {
        /// Exact topic or wildcard pattern (`+` full-level, `#` trailing only).
        pattern: String,
        /// Whether the destructive confirm flag was present.
        confirmed: bool,
    },
}

/// The top-level result of parsing one input line (spec §4.3).
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// A recognized, argument-valid `:`-command.
    Command(ParsedCommand),
    /// A bare search term (a line not beginning with `:` or `/`).
    SearchTerm(String),
    /// A `/`-prefixed topic search.
    TopicSearch(String),
    /// Parsing failed; `reason` is a human-readable explanation.
    Failure {
        /// Why parsing failed.
        reason: String,
    },
}

impl CommandOutcome {
    pub(crate) fn failure(reason: impl std::fmt::Display) -> Self {
        Self::Failure { reason: reason.to_string() }
    }
}
