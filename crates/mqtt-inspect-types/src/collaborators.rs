//! Collaborator trait contracts (spec §6): external systems the core calls
//! into but never owns or constructs by default. Production implementations
//! are provided here; test fakes live alongside the crates that need
//! deterministic control over them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::PublishFailureKind;

/// Monotonic UTC wall-clock source, injected so TTL expiry is testable.
pub trait ClockSource: Send + Sync {
    /// The current UTC instant.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// System wall clock. The production default.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of process-unique 128-bit identifiers for ingested messages.
pub trait IdSource: Send + Sync {
    /// Generate a fresh identifier. Collision probability is negligible.
    fn new_id(&self) -> u128;
}

/// `uuid` v4-backed identifier source. The production default.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidV4IdSource;

impl IdSource for UuidV4IdSource {
    fn new_id(&self) -> u128 {
        uuid::Uuid::new_v4().as_u128()
    }
}

/// Deterministic identifier source for tests: returns sequential integers.
#[derive(Debug, Default)]
pub struct SequentialIdSource {
    next: AtomicU64,
}

impl IdSource for SequentialIdSource {
    fn new_id(&self) -> u128 {
        u128::from(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Deterministic clock for tests: advances only when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::MIN_UTC + chrono::Duration::days(1))
    }
}

impl FixedClock {
    /// Start the clock at a fixed instant.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Advance the clock by `delta`.
    pub fn advance(&self, delta: chrono::Duration) {
        let mut guard = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard += delta;
    }
}

impl ClockSource for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Structured logging sink. Production code routes this to `tracing`; the
/// core never calls `println!`/`eprintln!` directly.
pub trait Logger: Send + Sync {
    /// Log an informational message.
    fn info(&self, message: &str);
    /// Log a warning (duplicate id, proxy substitution, ...).
    fn warn(&self, message: &str);
    /// Log an error.
    fn error(&self, message: &str);
}

/// `tracing`-backed logger. The production default.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Whether a topic is currently subscribed by the session, for
/// `NavigationPolicy` (spec §4.6).
pub trait SubscriptionOracle: Send + Sync {
    /// True iff `topic` is currently subscribed.
    fn is_subscribed(&self, topic: &str) -> bool;
}

/// Publishes a message to the broker. Used by `deletetopic` (an empty
/// retained payload clears broker-side retained state) and by generic
/// publish commands.
#[async_trait]
pub trait MqttPublisher: Send + Sync {
    /// Publish `payload` to `topic`.
    ///
    /// # Errors
    ///
    /// Returns a classified failure (spec §7 `Transient`) on any publish
    /// failure; never panics.
    async fn publish(
        &self,
        topic: &str,
        payload: &[u8],
        retain: bool,
        qos: crate::message::Qos,
    ) -> Result<(), PublishFailureKind>;
}

/// Fuzzy substring similarity, 0..100. Used by `TopicTree::apply_filter`
/// with a hard-coded threshold of 80 (spec §6).
pub trait FuzzyMatcher: Send + Sync {
    /// Best-match substring alignment score between `a` and `b`, 0..100.
    fn partial_ratio(&self, a: &str, b: &str) -> i32;
}
