//! Command-line surface for the demonstration binary.

use std::path::PathBuf;

use clap::Parser;

/// Stdin-driven MQTT v5 inspector engine demo — no real broker, no GUI.
///
/// Type `:help` once running for the list of recognized commands.
#[derive(Debug, Parser)]
#[command(name = "inspector-cli", version, about)]
pub struct Cli {
    /// Path to the persisted settings JSON file.
    #[arg(long, default_value = "inspector-settings.json")]
    pub settings: PathBuf,

    /// Default per-topic byte-budget for the retention store.
    #[arg(long, default_value_t = 65_536)]
    pub buffer_budget: usize,

    /// Correlation-tracker TTL, in seconds.
    #[arg(long, default_value_t = 1800)]
    pub correlation_ttl_secs: u64,

    /// How often the correlation sweeper runs, in seconds.
    #[arg(long, default_value_t = 30)]
    pub sweep_interval_secs: u64,

    /// How often the synthetic feed emits a message, in milliseconds.
    /// Set to 0 to disable the synthetic feed entirely.
    #[arg(long, default_value_t = 1_000)]
    pub feed_interval_ms: u64,
}
