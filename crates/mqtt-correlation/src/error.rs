//! Structured classification for `CorrelationTracker`'s boundary-operation
//! failures (spec §7: register/link "failures are return-value failures,
//! never aborts"). The public API still answers `bool` per spec.md §4.2 —
//! this type exists so the tracker can log a specific, greppable reason
//! instead of a bare `false`, mirroring the teacher's per-crate `error.rs`
//! convention.
use thiserror::Error;

/// Why a `register_request` or `link_response` call returned `false`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CorrelationError {
    /// `register_request` was called with empty correlation-data.
    #[error("empty correlation-data")]
    EmptyCorrelationData,
    /// `register_request` was called with an empty response-topic.
    #[error("empty response-topic")]
    EmptyResponseTopic,
    /// `register_request` was called for correlation-data that already has
    /// a live entry.
    #[error("an entry already exists for this correlation-data")]
    DuplicateCorrelationData,
    /// `link_response` found no entry for the given correlation-data.
    #[error("no entry for this correlation-data")]
    UnknownCorrelationData,
    /// `link_response` found an entry, but it had already expired.
    #[error("entry for this correlation-data has expired")]
    Expired,
    /// `link_response`'s `actual_topic` did not byte-exactly match the
    /// entry's expected response-topic.
    #[error("response topic {actual:?} does not match expected {expected:?}")]
    TopicMismatch {
        /// The topic the response actually arrived on.
        actual: String,
        /// The topic the request registered as its expected response topic.
        expected: String,
    },
}
