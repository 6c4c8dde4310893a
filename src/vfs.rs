//! Virtual File System
//!
//! The registry of top-level roots and the public entry point used by the
//! snapshotting, invalidation and up-to-date-check collaborators. All paths given
//! here are absolute.

use crate::error::VfsError;
use crate::snapshot::FileSystemSnapshot;
use crate::tree::{path, MutableNode, Node, TreeStats};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// Cache of file-system snapshots shared by concurrently running build workers
pub struct VirtualFileSystem {
    /// Swapped wholesale on `clear`; every other write locks only its own slot
    root: RwLock<Arc<MutableNode>>,
}

impl Default for VirtualFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFileSystem {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Arc::new(MutableNode::root())),
        }
    }

    fn root(&self) -> Arc<MutableNode> {
        self.root.read().clone()
    }

    /// The root node; it has neither path nor snapshot
    pub fn root_node(&self) -> Node {
        Node::Root(self.root())
    }

    /// Node at `path`; the root for an empty path or `/`
    pub fn get_descendant(&self, path: &str) -> Result<Node, VfsError> {
        let segments = parse(path)?;
        Ok(self.root_node().get_descendant(&segments))
    }

    /// Best-known snapshot at `path`
    ///
    /// `None` means only partial knowledge is held and the location has to be
    /// snapshotted again.
    pub fn read(&self, path: &str) -> Result<Option<FileSystemSnapshot>, VfsError> {
        self.get_descendant(path)?.snapshot()
    }

    /// Install `supplier(current)` at `path`; the last writer wins
    ///
    /// `supplier` may run more than once when a concurrent writer changes the slot
    /// between computation and install.
    pub fn replace_descendant<F>(&self, path: &str, supplier: F) -> Result<Node, VfsError>
    where
        F: FnMut(Option<&Node>) -> Node,
    {
        let segments = parse(path)?;
        if segments.is_empty() {
            return Err(VfsError::EmptyPath {
                operation: "replace the root",
            });
        }
        self.root().replace(&segments, supplier)
    }

    /// Record a freshly computed snapshot at its own absolute path
    pub fn store(&self, snapshot: FileSystemSnapshot) -> Result<Node, VfsError> {
        let path = snapshot.absolute_path().to_string();
        debug!(path = %path, file_type = ?snapshot.file_type(), "Storing snapshot");
        self.replace_descendant(&path, |_| Node::from_snapshot(snapshot.clone()))
    }

    /// Forget what is known at `path`
    ///
    /// Returns whether stored state changed; removing a missing path is a no-op.
    pub fn remove_descendant(&self, path: &str) -> Result<bool, VfsError> {
        let segments = parse(path)?;
        if segments.is_empty() {
            return Err(VfsError::CannotRemoveCurrent);
        }
        self.root().remove(&segments)
    }

    /// Remove every path, returning how many removals changed stored state
    pub fn invalidate<I, S>(&self, paths: I) -> Result<usize, VfsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut changed = 0;
        for path in paths {
            if self.remove_descendant(path.as_ref())? {
                changed += 1;
            }
        }
        debug!(changed, "Invalidated paths");
        Ok(changed)
    }

    /// Drop all stored knowledge at once
    pub fn clear(&self) {
        let previous = std::mem::replace(&mut *self.root.write(), Arc::new(MutableNode::root()));
        info!(roots = previous.len(), "Cleared virtual file system");
    }

    /// Names of the registered top-level roots
    pub fn stored_roots(&self) -> Vec<String> {
        self.root().child_names()
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        self.root().collect_stats(&mut stats);
        stats
    }
}

fn parse(path: &str) -> Result<Vec<&str>, VfsError> {
    if !path.is_empty() && !path::is_absolute(path) {
        return Err(VfsError::NotAbsolute(path.to_string()));
    }
    Ok(path::tree_segments(path))
}
