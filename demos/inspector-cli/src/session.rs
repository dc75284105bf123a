//! Wires one REPL line through `mqtt-command::parse` and into whichever
//! engine component answers it. This is the demo binary's only stateful
//! object; everything else it holds is an `Arc` to an engine crate.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;

use mqtt_command::{CommandOutcome, ExportScope, ParsedCommand, ViewMode};
use mqtt_inspect_types::{export_json, export_text, ExportFormat, FuzzyMatcher, MqttPublisher, Settings};
use mqtt_ingest::execute_confirmed_delete;
use mqtt_navigation::{SearchContext, TopicReference};
use mqtt_topic_store::TopicStore;
use mqtt_topic_tree::{partial_ratio, TopicTree};

use crate::settings_store;

struct PartialRatio;

impl FuzzyMatcher for PartialRatio {
    fn partial_ratio(&self, a: &str, b: &str) -> i32 {
        partial_ratio(a, b)
    }
}

pub struct Session {
    settings_path: PathBuf,
    settings: Settings,
    store: Arc<TopicStore>,
    tree: Arc<TopicTree>,
    publisher: Arc<dyn MqttPublisher>,
    delete_cancellation: CancellationToken,
    matcher: PartialRatio,
    selected_topic: Option<String>,
    view_mode: ViewMode,
    search: Option<SearchContext>,
    paused: Arc<AtomicBool>,
}

impl Session {
    #[must_use]
    pub fn new(
        settings_path: PathBuf,
        settings: Settings,
        store: Arc<TopicStore>,
        tree: Arc<TopicTree>,
        publisher: Arc<dyn MqttPublisher>,
        paused: Arc<AtomicBool>,
    ) -> Self {
        Self {
            settings_path,
            settings,
            store,
            tree,
            publisher,
            delete_cancellation: CancellationToken::new(),
            matcher: PartialRatio,
            selected_topic: None,
            view_mode: ViewMode::Raw,
            search: None,
            paused,
        }
    }

    /// The current settings snapshot, for passing to [`mqtt_command::parse`].
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn persist_settings(&self) -> String {
        match settings_store::save(&self.settings_path, &self.settings) {
            Ok(()) => String::new(),
            Err(err) => format!(" (failed to persist settings: {err})"),
        }
    }

    /// Handle one already-parsed outcome from [`mqtt_command::parse`] and
    /// return a line to print to the operator.
    pub async fn dispatch(&mut self, outcome: CommandOutcome) -> String {
        match outcome {
            CommandOutcome::Failure { reason } => format!("error: {reason}"),
            CommandOutcome::SearchTerm(term) => set_search_term(&term),
            CommandOutcome::TopicSearch(term) => self.topic_search(&term),
            CommandOutcome::Command(command) => self.dispatch_command(command).await,
        }
    }

    /// Repeating the same `/term` search advances the wrap-around cursor
    /// over the existing match list instead of rebuilding it — the same
    /// "search again to step to the next result" idiom the keyboard
    /// navigation commands use (spec §2/§3).
    fn topic_search(&mut self, term: &str) -> String {
        if let Some(ctx) = &mut self.search {
            if ctx.term() == term {
                ctx.advance();
                return match ctx.current() {
                    Some(topic_ref) => {
                        self.selected_topic = Some(topic_ref.full_path.clone());
                        format!(
                            "topic search {term:?}: advanced to match {}/{} — {}",
                            ctx.current_index() + 1,
                            ctx.matches().len(),
                            topic_ref.full_path
                        )
                    }
                    None => format!("topic search {term:?}: no matches"),
                };
            }
        }

        let lower = term.to_lowercase();
        let matches: Vec<TopicReference> = self
            .store
            .topics()
            .into_iter()
            .filter(|t| self.matcher.partial_ratio(&t.to_lowercase(), &lower) > 80)
            .map(TopicReference::new)
            .collect();
        let count = matches.len();
        let ctx = SearchContext::new(term, matches);
        let first = ctx.current().map(|m| m.full_path.clone());
        self.search = Some(ctx);
        match first {
            Some(topic) => {
                self.selected_topic = Some(topic.clone());
                format!("topic search {term:?}: {count} match(es), selected {topic}")
            }
            None => format!("topic search {term:?}: no matches"),
        }
    }

    async fn dispatch_command(&mut self, command: ParsedCommand) -> String {
        match command {
            ParsedCommand::Connect(request) => {
                format!(
                    "connect requested to {}:{} (no real broker in this demo; synthetic feed already running)",
                    request.host, request.port
                )
            }
            ParsedCommand::Disconnect => "disconnect requested (no-op: no real broker connection)".to_string(),
            ParsedCommand::Export { scope, format, path } => self.export(scope, format, &path),
            ParsedCommand::Filter { pattern } => {
                self.tree.apply_filter(pattern.as_deref());
                match pattern {
                    Some(p) => format!("filter applied: {p:?}"),
                    None => "filter cleared".to_string(),
                }
            }
            ParsedCommand::Clear => {
                self.store.clear_all();
                "store cleared".to_string()
            }
            ParsedCommand::Help { topic } => help_text(topic.as_deref()),
            ParsedCommand::Pause => {
                self.paused.store(true, Ordering::Relaxed);
                "ingest paused".to_string()
            }
            ParsedCommand::Resume => {
                self.paused.store(false, Ordering::Relaxed);
                "ingest resumed".to_string()
            }
            ParsedCommand::Copy => "copy requested (no clipboard in this demo binary)".to_string(),
            ParsedCommand::Expand => {
                self.tree.expand_all();
                "tree expanded".to_string()
            }
            ParsedCommand::Collapse => {
                self.tree.collapse_all();
                "tree collapsed".to_string()
            }
            ParsedCommand::Settings => {
                serde_json::to_string_pretty(&self.settings).unwrap_or_else(|err| format!("error: {err}"))
            }
            ParsedCommand::Search { term } => set_search_term(&term.unwrap_or_default()),
            ParsedCommand::View { mode } => {
                self.view_mode = mode;
                format!("view mode set to {mode:?}")
            }
            ParsedCommand::SetUser { value } => {
                self.settings.username = Some(value);
                format!("username updated{}", self.persist_settings())
            }
            ParsedCommand::SetPass { value } => {
                self.settings.password = Some(value);
                format!("password updated{}", self.persist_settings())
            }
            ParsedCommand::SetAuthMode { mode } => {
                self.settings.auth_mode = mode;
                format!("auth mode set to {mode:?}{}", self.persist_settings())
            }
            ParsedCommand::SetAuthMethod { value } => {
                self.settings.auth_method = Some(value);
                format!("auth method updated{}", self.persist_settings())
            }
            ParsedCommand::SetAuthData { value } => {
                self.settings.auth_data = Some(value);
                format!("auth data updated{}", self.persist_settings())
            }
            ParsedCommand::SetUseTls { value } => {
                self.settings.use_tls = value;
                format!("use_tls set to {value}{}", self.persist_settings())
            }
            ParsedCommand::DeleteTopic { pattern, confirmed } => self.delete_topic(&pattern, confirmed).await,
        }
    }

    fn export(&self, scope: ExportScope, format: ExportFormat, path: &str) -> String {
        let entries = match scope {
            ExportScope::Selected => match &self.selected_topic {
                Some(topic) => self.store.messages_for(topic),
                None => return "error: no topic selected".to_string(),
            },
            ExportScope::All => self
                .store
                .topics()
                .iter()
                .flat_map(|t| self.store.messages_for(t))
                .collect(),
        };

        let rendered = match format {
            ExportFormat::Json => match export_json(&entries) {
                Ok(text) => text,
                Err(err) => return format!("error: {err}"),
            },
            ExportFormat::Txt => export_text(&entries),
        };

        match std::fs::write(path, rendered) {
            Ok(()) => format!("exported {} message(s) to {path}", entries.len()),
            Err(err) => format!("error: failed to write {path}: {err}"),
        }
    }

    async fn delete_topic(&mut self, pattern: &str, confirmed: bool) -> String {
        let known_topics = self.store.topics();
        self.delete_cancellation = CancellationToken::new();
        match execute_confirmed_delete(
            pattern,
            confirmed,
            &known_topics,
            self.publisher.as_ref(),
            &self.delete_cancellation,
        )
        .await
        {
            Ok(report) => format!(
                "deletetopic {pattern:?}: {} cleared, {} failed, cancelled={}",
                report.successful.len(),
                report.failed.len(),
                report.cancelled
            ),
            Err(err) => format!("error: {err}"),
        }
    }

    /// Render a one-line ambient status summary (topic count, byte
    /// occupancy, correlation tracker size) for the REPL prompt.
    #[must_use]
    pub fn status_line(&self) -> String {
        let stats = self.store.stats();
        format!(
            "[{} topics, {} bytes, {} entries]",
            stats.topic_count, stats.total_bytes, stats.entry_count
        )
    }
}

fn set_search_term(term: &str) -> String {
    if term.is_empty() {
        "cleared message search term".to_string()
    } else {
        format!("message search term set to {term:?} (filters the selected topic's view)")
    }
}

fn help_text(topic: Option<&str>) -> String {
    match topic {
        Some(t) => format!("help for {t:?}: no topic-specific help text in this demo binary"),
        None => {
            "commands: :connect :disconnect :export :filter :clear :help :pause :resume :copy \
             :expand :collapse :settings :search :view :setuser :setpass :setauthmode \
             :setauthmethod :setauthdata :setusetls :deletetopic; bare text searches messages, \
             /text searches topics"
                .to_string()
        }
    }
}
