//! Stored mutable nodes
//!
//! The only mutable shared state of the tree. Each node owns a concurrent map from
//! segment to child. Replacements are computed without holding any lock and then
//! installed only if the slot still holds the value they were computed from;
//! otherwise the computation is retried against the newer value.

use super::node::{missing_descendant, Node};
use super::path;
use crate::error::VfsError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

/// Counts over stored tree state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Stored mutable nodes, the root excluded
    pub mutable_nodes: usize,
    /// Children held as snapshot views directly in a mutable node
    pub snapshot_entries: usize,
}

#[derive(Debug, Default)]
pub struct MutableNode {
    /// `None` only for the root
    absolute_path: Option<String>,
    children: DashMap<String, Node>,
}

impl MutableNode {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    pub(crate) fn new(absolute_path: impl Into<String>) -> Self {
        Self {
            absolute_path: Some(absolute_path.into()),
            children: DashMap::new(),
        }
    }

    pub fn absolute_path(&self) -> Option<&str> {
        self.absolute_path.as_deref()
    }

    pub fn child(&self, name: &str) -> Option<Node> {
        self.children.get(name).map(|child| child.value().clone())
    }

    /// Names of the stored children, sorted
    pub fn child_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.children.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn child_path(&self, name: &str) -> String {
        match &self.absolute_path {
            Some(parent) => path::child_absolute_path(parent, name),
            None => path::root_child_path(name),
        }
    }

    /// Add a child to a node that is not yet shared
    pub(crate) fn insert_child(&self, name: &str, node: Node) {
        self.children.insert(name.to_string(), node);
    }

    pub(crate) fn replace<F>(&self, segments: &[&str], mut supplier: F) -> Result<Node, VfsError>
    where
        F: FnMut(Option<&Node>) -> Node,
    {
        let Some((first, rest)) = segments.split_first() else {
            return Err(VfsError::EmptyPath {
                operation: "replace a child",
            });
        };

        loop {
            let current = self.child(first);

            if rest.is_empty() {
                let replacement = supplier(current.as_ref());
                if self.install_if_unchanged(first, current.as_ref(), replacement.clone()) {
                    return Ok(replacement);
                }
            } else {
                match current {
                    Some(Node::Root(node) | Node::Mutable(node)) => return node.replace(rest, supplier),
                    Some(Node::CompleteDirectory(directory)) => {
                        let mut promoted = None;
                        let result = directory
                            .replace_descendant(rest, &mut supplier, &mut |node| promoted = Some(node))?;
                        let Some(promoted) = promoted else {
                            return Ok(result);
                        };
                        let expected = Node::CompleteDirectory(directory);
                        if self.install_if_unchanged(first, Some(&expected), promoted) {
                            return Ok(result);
                        }
                    }
                    Some(leaf) => return Ok(leaf.get_descendant(rest)),
                    None => {
                        self.children.entry(first.to_string()).or_insert_with(|| {
                            trace!(path = %self.child_path(first), "Created mutable placeholder");
                            Node::Mutable(Arc::new(MutableNode::new(self.child_path(first))))
                        });
                        continue;
                    }
                }
            }
            trace!(path = %self.child_path(first), "Slot changed while computing replacement, retrying");
        }
    }

    pub(crate) fn remove(&self, segments: &[&str]) -> Result<bool, VfsError> {
        let Some((first, rest)) = segments.split_first() else {
            return Err(VfsError::CannotRemoveCurrent);
        };

        if rest.is_empty() {
            let removed = match self.children.remove(*first) {
                Some((_, Node::Missing(_))) | None => false,
                Some(_) => true,
            };
            if removed {
                debug!(path = %self.child_path(first), "Removed stored node");
            }
            return Ok(removed);
        }

        loop {
            let directory = match self.child(first) {
                None => return Ok(false),
                Some(Node::Root(node) | Node::Mutable(node)) => return node.remove(rest),
                Some(Node::CompleteDirectory(directory)) => directory,
                Some(Node::RegularFile(_) | Node::Missing(_)) => return Ok(false),
            };
            let mut promoted = None;
            let removed = directory.remove_descendant(rest, &mut |node| promoted = Some(node))?;
            let Some(promoted) = promoted else {
                return Ok(removed);
            };
            let expected = Node::CompleteDirectory(directory);
            if self.install_if_unchanged(first, Some(&expected), promoted) {
                return Ok(removed);
            }
            trace!(path = %self.child_path(first), "Slot changed while promoting for removal, retrying");
        }
    }

    /// Write `replacement` into slot `name` unless another writer got there first
    ///
    /// The entry lock is held only for the comparison and the write.
    fn install_if_unchanged(&self, name: &str, expected: Option<&Node>, replacement: Node) -> bool {
        match (self.children.entry(name.to_string()), expected) {
            (Entry::Occupied(mut entry), Some(expected)) if entry.get().ptr_eq(expected) => {
                entry.insert(replacement);
                true
            }
            (Entry::Vacant(entry), None) => {
                entry.insert(replacement);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn collect_stats(&self, stats: &mut TreeStats) {
        for entry in self.children.iter() {
            match entry.value() {
                Node::Root(node) | Node::Mutable(node) => {
                    stats.mutable_nodes += 1;
                    node.collect_stats(stats);
                }
                _ => stats.snapshot_entries += 1,
            }
        }
    }

    /// Missing node for a path below this one that has nothing stored
    pub(crate) fn missing_child(&self, first: &str, rest: &[&str]) -> Node {
        missing_descendant(self.child_path(first), rest)
    }
}
