//! Arena storage for topic tree nodes (spec §9): a flat `Vec` addressed by
//! index, so parent back-references are plain indices rather than owning
//! pointers.

/// Internal arena slot. Never exposed directly — callers see
/// [`TopicTreeNode`](crate::TopicTreeNode) snapshots instead.
#[derive(Debug, Clone)]
pub(crate) struct NodeSlot {
    pub segment: String,
    pub full_path: String,
    pub count: u64,
    pub children: Vec<usize>,
    pub parent: Option<usize>,
    pub visible: bool,
    pub expanded: bool,
}

impl NodeSlot {
    pub fn new(segment: String, full_path: String, parent: Option<usize>) -> Self {
        Self {
            segment,
            full_path,
            count: 0,
            children: Vec::new(),
            parent,
            visible: true,
            expanded: false,
        }
    }
}

/// Owned, read-only snapshot of one tree node, returned to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicTreeNode {
    /// The final `/`-separated segment of this node's path.
    pub segment: String,
    /// The full path from the tree root to this node.
    pub full_path: String,
    /// Message count observed at this exact path.
    pub count: u64,
    /// Snapshots of immediate children, sorted case-insensitively by
    /// segment.
    pub children: Vec<TopicTreeNode>,
    /// Whether this node currently passes the active filter.
    pub visible: bool,
    /// Whether this node is expanded in the (external) tree view.
    pub expanded: bool,
    /// Full path of the parent node, if any. A lookup key only — never an
    /// owning reference.
    pub parent_path: Option<String>,
}
