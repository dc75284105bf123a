//! inspector-cli: stdin-driven demonstration binary for the MQTT v5
//! inspector engine crates.
//!
//! Two `tokio` tasks communicate over an `mpsc` channel — a synthetic feed
//! standing in for a broker subscription, and the command loop reading
//! stdin — mirroring the ingest/command split the engine crates themselves
//! are deliberately executor-agnostic about.
//!
//! Logging: set `RUST_LOG=inspector_cli=info` (or `debug`) to see engine
//! logs on stderr.

mod cli;
mod publisher;
mod session;
mod settings_store;
mod subscriptions;
mod synthetic_feed;

use std::io::IsTerminal;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use mqtt_correlation::CorrelationTracker;
use mqtt_inspect_types::{SystemClock, TracingLogger, UuidV4IdSource};
use mqtt_ingest::{IngestCoordinator, NavigationPolicy};
use mqtt_topic_store::TopicStore;
use mqtt_topic_tree::TopicTree;

use crate::cli::Cli;
use crate::publisher::LoggingPublisher;
use crate::session::Session;
use crate::settings_store::load as load_settings;
use crate::subscriptions::ObservedTopicSubscriptions;
use crate::synthetic_feed::IngestEvent;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("inspector_cli=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let settings = load_settings(&cli.settings)?;

    let clock: Arc<SystemClock> = Arc::new(SystemClock);
    let ids = Arc::new(UuidV4IdSource);
    let logger = Arc::new(TracingLogger);

    let store = Arc::new(TopicStore::new(cli.buffer_budget, clock.clone(), ids.clone(), logger.clone()));
    let tree = Arc::new(TopicTree::default());
    let correlation = Arc::new(CorrelationTracker::new(clock.clone()));
    let subscriptions = Arc::new(ObservedTopicSubscriptions::default());
    let publisher = Arc::new(LoggingPublisher);

    let ingest = Arc::new(
        IngestCoordinator::new(store.clone(), tree.clone(), correlation.clone(), ids.clone())
            .with_correlation_ttl(Duration::from_secs(cli.correlation_ttl_secs)),
    );
    let navigation = NavigationPolicy::new(correlation.clone(), subscriptions.clone());

    let shutdown = CancellationToken::new();
    let _sweeper = correlation
        .clone()
        .spawn_sweeper(Duration::from_secs(cli.sweep_interval_secs), shutdown.clone());

    let (tx, mut rx) = mpsc::channel::<IngestEvent>(256);
    let paused = Arc::new(AtomicBool::new(false));

    let feed_handle = tokio::spawn(synthetic_feed::run(
        tx,
        Duration::from_millis(cli.feed_interval_ms),
        subscriptions.clone(),
        paused.clone(),
        shutdown.clone(),
    ));

    let ingest_task_shutdown = shutdown.clone();
    let ingest_handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                () = ingest_task_shutdown.cancelled() => break,
                event = rx.recv() => {
                    let Some(event) = event else { break };
                    let outcome = ingest.ingest(&event.topic, event.message);
                    if !outcome.evicted.is_empty() {
                        tracing::debug!(topic = %outcome.topic, evicted = outcome.evicted.len(), "eviction on ingest");
                    }
                    if let mqtt_ingest::CorrelationAction::RegisteredRequest { registered: true } = outcome.correlation_action {
                        tracing::info!(id = %outcome.id, "registered correlation request");
                    }
                    if let mqtt_ingest::CorrelationAction::LinkedResponse { linked: true } = outcome.correlation_action {
                        let status = navigation.status_for(outcome.id);
                        tracing::info!(id = %outcome.id, ?status, "linked correlation response");
                    }
                }
            }
        }
    });

    let mut session = Session::new(
        cli.settings.clone(),
        settings,
        store,
        tree,
        publisher,
        paused,
    );

    let stdin = tokio::io::stdin();
    if std::io::stdin().is_terminal() {
        eprintln!("inspector-cli ready. Type :help for commands, Ctrl-D to exit.");
    }
    let mut lines = BufReader::new(stdin).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        let outcome = mqtt_command::parse(trimmed, session.settings());
        let response = session.dispatch(outcome).await;
        println!("{response}");
        println!("{}", session.status_line());
    }

    shutdown.cancel();
    feed_handle.abort();
    ingest_handle.abort();
    Ok(())
}
