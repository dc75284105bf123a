//! The TopicTree (spec §4.4): hierarchical topic aggregation with counts,
//! ordering, filter visibility, and expansion state.

use std::sync::{Arc, RwLock};

use mqtt_inspect_types::FuzzyMatcher;

use crate::fuzzy::PartialRatioMatcher;
use crate::node::{NodeSlot, TopicTreeNode};

/// Fuzzy partial-ratio threshold above which a segment counts as a match
/// (spec §6, hard-coded).
const FUZZY_THRESHOLD: i32 = 80;

struct Inner {
    nodes: Vec<NodeSlot>,
    roots: Vec<usize>,
}

/// Hierarchical, session-lifetime view of every topic path observed so far.
pub struct TopicTree {
    inner: RwLock<Inner>,
    matcher: Arc<dyn FuzzyMatcher>,
}

impl Default for TopicTree {
    fn default() -> Self {
        Self::new(Arc::new(PartialRatioMatcher))
    }
}

impl TopicTree {
    /// Create an empty tree using the given fuzzy matcher for filtering.
    #[must_use]
    pub fn new(matcher: Arc<dyn FuzzyMatcher>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                nodes: Vec::new(),
                roots: Vec::new(),
            }),
            matcher,
        }
    }

    fn sorted_insert(nodes: &[NodeSlot], siblings: &mut Vec<usize>, new_idx: usize) {
        let key = nodes[new_idx].segment.to_lowercase();
        let pos = siblings
            .binary_search_by(|&idx| nodes[idx].segment.to_lowercase().cmp(&key))
            .unwrap_or_else(|insert_at| insert_at);
        siblings.insert(pos, new_idx);
    }

    /// Walk `topic`'s `/`-separated segments, creating any missing nodes,
    /// and increment the final segment's count by `increment` (spec §4.4).
    /// Re-observing the same path finds the existing node by exact segment
    /// equality at each level — never creates a duplicate.
    pub fn observe(&self, topic: &str, increment: u64) {
        if topic.is_empty() {
            return;
        }
        let mut inner = self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut parent: Option<usize> = None;
        let mut path_so_far = String::new();
        let mut last_idx = None;

        for segment in topic.split('/') {
            if !path_so_far.is_empty() {
                path_so_far.push('/');
            }
            path_so_far.push_str(segment);

            let existing = match parent {
                Some(p) => inner.nodes[p]
                    .children
                    .iter()
                    .copied()
                    .find(|&c| inner.nodes[c].segment == segment),
                None => inner
                    .roots
                    .iter()
                    .copied()
                    .find(|&c| inner.nodes[c].segment == segment),
            };

            let idx = if let Some(idx) = existing {
                idx
            } else {
                let slot = NodeSlot::new(segment.to_string(), path_so_far.clone(), parent);
                inner.nodes.push(slot);
                let new_idx = inner.nodes.len() - 1;
                match parent {
                    Some(p) => {
                        let mut siblings = std::mem::take(&mut inner.nodes[p].children);
                        Self::sorted_insert(&inner.nodes, &mut siblings, new_idx);
                        inner.nodes[p].children = siblings;
                    }
                    None => {
                        let mut roots = std::mem::take(&mut inner.roots);
                        Self::sorted_insert(&inner.nodes, &mut roots, new_idx);
                        inner.roots = roots;
                    }
                }
                new_idx
            };

            parent = Some(idx);
            last_idx = Some(idx);
        }

        if let Some(idx) = last_idx {
            inner.nodes[idx].count += increment;
        }
    }

    /// Apply a fuzzy filter. `None` or whitespace clears to universally
    /// visible. A node is visible iff its own segment matches the pattern
    /// (partial-ratio > 80, lower-cased) or any descendant matches.
    pub fn apply_filter(&self, pattern: Option<&str>) {
        let pattern = pattern.map(str::trim).filter(|p| !p.is_empty());
        let mut inner = self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner);

        let Some(pattern) = pattern else {
            for node in &mut inner.nodes {
                node.visible = true;
            }
            return;
        };

        let lower_pattern = pattern.to_lowercase();
        let self_match: Vec<bool> = inner
            .nodes
            .iter()
            .map(|n| self.matcher.partial_ratio(&n.segment.to_lowercase(), &lower_pattern) > FUZZY_THRESHOLD)
            .collect();

        let n = inner.nodes.len();
        let mut visible = vec![false; n];
        // Children are always created after their parent, so a single
        // reverse pass computes bottom-up visibility correctly.
        for i in (0..n).rev() {
            let child_visible = inner.nodes[i].children.iter().any(|&c| visible[c]);
            visible[i] = self_match[i] || child_visible;
        }
        for (i, v) in visible.into_iter().enumerate() {
            inner.nodes[i].visible = v;
        }
    }

    /// Clear any active filter; every node becomes visible.
    pub fn clear_filter(&self) {
        self.apply_filter(None);
    }

    /// Expand every node.
    pub fn expand_all(&self) {
        let mut inner = self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        for node in &mut inner.nodes {
            node.expanded = true;
        }
    }

    /// Collapse every node.
    pub fn collapse_all(&self) {
        let mut inner = self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        for node in &mut inner.nodes {
            node.expanded = false;
        }
    }

    fn to_snapshot(nodes: &[NodeSlot], idx: usize) -> TopicTreeNode {
        let node = &nodes[idx];
        TopicTreeNode {
            segment: node.segment.clone(),
            full_path: node.full_path.clone(),
            count: node.count,
            children: node.children.iter().map(|&c| Self::to_snapshot(nodes, c)).collect(),
            visible: node.visible,
            expanded: node.expanded,
            parent_path: node.parent.map(|p| nodes[p].full_path.clone()),
        }
    }

    /// Look up a node snapshot by its full path.
    #[must_use]
    pub fn find(&self, full_path: &str) -> Option<TopicTreeNode> {
        let inner = self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        let idx = inner.nodes.iter().position(|n| n.full_path == full_path)?;
        Some(Self::to_snapshot(&inner.nodes, idx))
    }

    /// Snapshot of every root node, in sorted order.
    #[must_use]
    pub fn roots(&self) -> Vec<TopicTreeNode> {
        let inner = self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.roots.iter().map(|&r| Self::to_snapshot(&inner.nodes, r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_observe_is_idempotent_on_structure() {
        let tree = TopicTree::default();
        tree.observe("a/b/c", 1);
        tree.observe("a/b/c", 1);
        tree.observe("a/b/c", 1);
        let node = tree.find("a/b/c").expect("node exists");
        assert_eq!(node.count, 3);
        assert_eq!(tree.roots().len(), 1);
    }

    #[test]
    fn children_are_sorted_case_insensitively() {
        let tree = TopicTree::default();
        tree.observe("root/Charlie", 1);
        tree.observe("root/alpha", 1);
        tree.observe("root/Bravo", 1);
        let root = tree.find("root").expect("root exists");
        let names: Vec<&str> = root.children.iter().map(|c| c.segment.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Bravo", "Charlie"]);
    }

    #[test]
    fn filter_then_clear_restores_visibility() {
        let tree = TopicTree::default();
        tree.observe("sensors/temp/reading", 1);
        tree.observe("sensors/humidity/reading", 1);
        tree.apply_filter(Some("temp"));

        let sensors = tree.find("sensors").expect("node exists");
        assert!(sensors.visible);
        let humidity = tree.find("sensors/humidity").expect("node exists");
        assert!(!humidity.visible);

        tree.clear_filter();
        let humidity = tree.find("sensors/humidity").expect("node exists");
        assert!(humidity.visible);
    }

    #[test]
    fn whitespace_pattern_clears_filter() {
        let tree = TopicTree::default();
        tree.observe("a/b", 1);
        tree.apply_filter(Some("zzz"));
        tree.apply_filter(Some("   "));
        assert!(tree.find("a/b").expect("node exists").visible);
    }

    #[test]
    fn find_reports_parent_path_by_lookup_only() {
        let tree = TopicTree::default();
        tree.observe("a/b/c", 1);
        let node = tree.find("a/b/c").expect("node exists");
        assert_eq!(node.parent_path.as_deref(), Some("a/b"));
    }
}
