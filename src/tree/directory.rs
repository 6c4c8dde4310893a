//! Complete directory views and promotion
//!
//! A complete directory is immutable. Changing anything below it promotes it: a
//! fresh mutable node is built holding the directory's untouched children as cheap
//! views plus the one changed child, and that node is handed to `install`, which
//! writes it into the slot the directory came from. Nested directories chain their
//! `install` continuations, so only the path from the stored ancestor down to the
//! touched entry is rebuilt.

use super::mutable::MutableNode;
use super::node::Node;
use super::path;
use crate::error::VfsError;
use crate::snapshot::{DirectorySnapshot, FileSystemSnapshot};
use crate::types::hash_to_hex;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CompleteDirectoryNode {
    snapshot: Arc<DirectorySnapshot>,
}

impl CompleteDirectoryNode {
    pub fn new(snapshot: Arc<DirectorySnapshot>) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Arc<DirectorySnapshot> {
        &self.snapshot
    }

    pub fn absolute_path(&self) -> &str {
        self.snapshot.absolute_path()
    }

    /// View of the direct child `name`, Missing when the directory has no such entry
    pub(crate) fn child_node(&self, name: &str) -> Node {
        match self.snapshot.child(name) {
            Some(child) => Node::from_snapshot(child.clone()),
            None => Node::missing(path::child_absolute_path(self.absolute_path(), name)),
        }
    }

    pub(crate) fn replace_descendant<F>(
        &self,
        segments: &[&str],
        supplier: F,
        install: &mut dyn FnMut(Node),
    ) -> Result<Node, VfsError>
    where
        F: FnOnce(Option<&Node>) -> Node,
    {
        let Some((first, rest)) = segments.split_first() else {
            return Err(VfsError::EmptyPath {
                operation: "replace below a complete directory",
            });
        };
        let current = self.child_node(first);

        if rest.is_empty() {
            let replacement = supplier(Some(&current));
            if let (Some(new_hash), Some(current_hash)) =
                (replacement.snapshot_hash(), current.snapshot_hash())
            {
                if new_hash == current_hash {
                    debug!(
                        path = %path::child_absolute_path(self.absolute_path(), first),
                        hash = %hash_to_hex(&current_hash),
                        "Snapshot unchanged, keeping complete directory"
                    );
                    return Ok(current);
                }
            }
            install(self.promote(first, Some(replacement.clone())));
            return Ok(replacement);
        }

        match current {
            Node::CompleteDirectory(child) => child.replace_descendant(rest, supplier, &mut |node| {
                install(self.promote(first, Some(node)))
            }),
            leaf => Ok(leaf.get_descendant(rest)),
        }
    }

    /// Returns whether anything was known at `segments` before removal
    pub(crate) fn remove_descendant(
        &self,
        segments: &[&str],
        install: &mut dyn FnMut(Node),
    ) -> Result<bool, VfsError> {
        let Some((first, rest)) = segments.split_first() else {
            return Err(VfsError::CannotRemoveCurrent);
        };
        let Some(child) = self.snapshot.child(first) else {
            return Ok(false);
        };

        if rest.is_empty() {
            if matches!(child, FileSystemSnapshot::Missing(_)) {
                return Ok(false);
            }
            install(self.promote(first, None));
            return Ok(true);
        }

        match child {
            FileSystemSnapshot::Directory(directory) => CompleteDirectoryNode::new(directory.clone())
                .remove_descendant(rest, &mut |node| install(self.promote(first, Some(node)))),
            _ => Ok(false),
        }
    }

    /// Mutable stand-in for this directory that differs only at `target`
    ///
    /// `None` leaves `target` out entirely; lookups then synthesize a Missing node
    /// and later writes below it create placeholders as under any mutable node.
    fn promote(&self, target: &str, replacement: Option<Node>) -> Node {
        let promoted = MutableNode::new(self.absolute_path());
        for child in self.snapshot.children() {
            if child.name() != target {
                promoted.insert_child(child.name(), Node::from_snapshot(child.clone()));
            }
        }
        if let Some(replacement) = replacement {
            promoted.insert_child(target, replacement);
        }
        debug!(
            path = %self.absolute_path(),
            child = target,
            "Promoted complete directory to mutable node"
        );
        Node::Mutable(Arc::new(promoted))
    }
}
