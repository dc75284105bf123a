//! Fatal-bug classification for `TopicBuffer`'s invariant (spec §7:
//! "Internal invariant violations... abort the component and are treated
//! as fatal bugs"). Never returned from a boundary operation — every
//! public `TopicStore` method still answers with a plain value per
//! spec.md §4.1/§7. This type exists only to give the abort a structured,
//! greppable `Display` instead of an inline string literal.
use thiserror::Error;

/// A `TopicBuffer` invariant was violated. Surfaced only via a panic
/// message (`Display`); never returned as a `Result`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TopicStoreError {
    /// A push was attempted that would have exceeded the buffer's budget
    /// without first evicting enough room — a caller bug, since
    /// [`crate::TopicBuffer::fits`] must be checked first.
    #[error("TopicBuffer invariant violated: pushing {incoming_size} bytes would exceed budget {budget} (current occupancy {current_bytes})")]
    BudgetInvariantViolated {
        /// Size of the entry that was about to be pushed.
        incoming_size: usize,
        /// The buffer's configured budget.
        budget: usize,
        /// Bytes already held before the push.
        current_bytes: usize,
    },
}
