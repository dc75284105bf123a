//! mqtt-topic-tree: hierarchical topic aggregation, fuzzy filtering.
//!
//! Maintains an ordered view of every topic path observed this session,
//! with per-node message counters, a visibility flag driven by a fuzzy
//! substring filter, and expansion state (spec §4.4).

mod fuzzy;
mod node;
mod tree;

pub use fuzzy::{partial_ratio, PartialRatioMatcher};
pub use node::TopicTreeNode;
pub use tree::TopicTree;
