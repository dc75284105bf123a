//! Structured classification for `mqtt-ingest`'s own boundary failures,
//! distinct from `PublishFailureKind` (which classifies a single broker
//! publish, not the decision to run a bulk operation at all).
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// A `:deletetopic` pattern reached the executor without its confirm
    /// flag set. Destructive bulk publishes never run unconfirmed.
    #[error("deletetopic for pattern {pattern:?} requires the confirm flag")]
    ConfirmationRequired { pattern: String },
}
