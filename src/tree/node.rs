//! Tree nodes
//!
//! A `Node` is either stored state (`Root`, `Mutable`) or a transient view over an
//! immutable snapshot (`CompleteDirectory`, `RegularFile`, `Missing`). Views are
//! synthesized during descent and dropped once the caller is done with them.

use super::directory::CompleteDirectoryNode;
use super::mutable::MutableNode;
use super::path;
use crate::error::VfsError;
use crate::snapshot::{FileSystemSnapshot, MissingFileSnapshot, RegularFileSnapshot};
use crate::types::{FileType, Hash};
use std::sync::Arc;

/// View over a regular file snapshot
#[derive(Debug, Clone)]
pub struct RegularFileNode {
    snapshot: Arc<RegularFileSnapshot>,
}

impl RegularFileNode {
    pub fn new(snapshot: Arc<RegularFileSnapshot>) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Arc<RegularFileSnapshot> {
        &self.snapshot
    }
}

/// View over a missing entry
#[derive(Debug, Clone)]
pub struct MissingFileNode {
    snapshot: Arc<MissingFileSnapshot>,
}

impl MissingFileNode {
    pub fn new(absolute_path: impl Into<String>) -> Self {
        Self {
            snapshot: Arc::new(MissingFileSnapshot::new(absolute_path)),
        }
    }

    pub fn from_snapshot(snapshot: Arc<MissingFileSnapshot>) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Arc<MissingFileSnapshot> {
        &self.snapshot
    }
}

/// A node of the live tree
#[derive(Debug, Clone)]
pub enum Node {
    /// Tree entry point; no path, no snapshot
    Root(Arc<MutableNode>),
    /// Directory known structurally, contents partially captured
    Mutable(Arc<MutableNode>),
    CompleteDirectory(CompleteDirectoryNode),
    RegularFile(RegularFileNode),
    Missing(MissingFileNode),
}

impl Node {
    /// Wrap a snapshot in the matching view
    pub fn from_snapshot(snapshot: FileSystemSnapshot) -> Node {
        match snapshot {
            FileSystemSnapshot::RegularFile(file) => Node::RegularFile(RegularFileNode::new(file)),
            FileSystemSnapshot::Directory(directory) => {
                Node::CompleteDirectory(CompleteDirectoryNode::new(directory))
            }
            FileSystemSnapshot::Missing(missing) => {
                Node::Missing(MissingFileNode::from_snapshot(missing))
            }
        }
    }

    pub fn missing(absolute_path: impl Into<String>) -> Node {
        Node::Missing(MissingFileNode::new(absolute_path))
    }

    pub fn file_type(&self) -> FileType {
        match self {
            Node::Root(_) | Node::Mutable(_) | Node::CompleteDirectory(_) => FileType::Directory,
            Node::RegularFile(_) => FileType::RegularFile,
            Node::Missing(_) => FileType::Missing,
        }
    }

    pub fn absolute_path(&self) -> Result<&str, VfsError> {
        match self {
            Node::Root(_) => Err(VfsError::RootHasNoPath),
            Node::Mutable(node) => node.absolute_path().ok_or(VfsError::RootHasNoPath),
            Node::CompleteDirectory(node) => Ok(node.absolute_path()),
            Node::RegularFile(node) => Ok(node.snapshot.absolute_path()),
            Node::Missing(node) => Ok(node.snapshot.absolute_path()),
        }
    }

    /// The complete snapshot this node stands for
    ///
    /// `Ok(None)` for a mutable node: only partial knowledge exists and the caller
    /// has to snapshot the location again.
    pub fn snapshot(&self) -> Result<Option<FileSystemSnapshot>, VfsError> {
        match self {
            Node::Root(_) => Err(VfsError::RootHasNoSnapshot),
            Node::Mutable(_) => Ok(None),
            _ => Ok(self.as_snapshot()),
        }
    }

    /// Whether this node is a view over a snapshot rather than stored mutable state
    pub fn is_snapshot(&self) -> bool {
        matches!(
            self,
            Node::CompleteDirectory(_) | Node::RegularFile(_) | Node::Missing(_)
        )
    }

    /// Same stored node, or a view over the same snapshot allocation
    pub fn ptr_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Root(a), Node::Root(b)) | (Node::Mutable(a), Node::Mutable(b)) => {
                Arc::ptr_eq(a, b)
            }
            (Node::CompleteDirectory(a), Node::CompleteDirectory(b)) => {
                Arc::ptr_eq(a.snapshot(), b.snapshot())
            }
            (Node::RegularFile(a), Node::RegularFile(b)) => Arc::ptr_eq(&a.snapshot, &b.snapshot),
            (Node::Missing(a), Node::Missing(b)) => Arc::ptr_eq(&a.snapshot, &b.snapshot),
            _ => false,
        }
    }

    pub(crate) fn as_snapshot(&self) -> Option<FileSystemSnapshot> {
        match self {
            Node::Root(_) | Node::Mutable(_) => None,
            Node::CompleteDirectory(node) => {
                Some(FileSystemSnapshot::Directory(node.snapshot().clone()))
            }
            Node::RegularFile(node) => Some(FileSystemSnapshot::RegularFile(node.snapshot.clone())),
            Node::Missing(node) => Some(FileSystemSnapshot::Missing(node.snapshot.clone())),
        }
    }

    pub(crate) fn snapshot_hash(&self) -> Option<Hash> {
        self.as_snapshot().map(|snapshot| snapshot.hash())
    }

    /// Node at `segments` below this one
    ///
    /// Never mutates stored state. Anything not recorded below a stored node, below
    /// a complete directory, or below a leaf resolves to a synthesized Missing node.
    pub fn get_descendant(&self, segments: &[&str]) -> Node {
        let Some((first, rest)) = segments.split_first() else {
            return self.clone();
        };
        let child = match self {
            Node::Root(node) | Node::Mutable(node) => match node.child(first) {
                Some(child) => child,
                None => return node.missing_child(first, rest),
            },
            Node::CompleteDirectory(node) => node.child_node(first),
            Node::RegularFile(node) => {
                return missing_descendant(
                    path::child_absolute_path(node.snapshot.absolute_path(), first),
                    rest,
                )
            }
            Node::Missing(node) => {
                return missing_descendant(
                    path::child_absolute_path(node.snapshot.absolute_path(), first),
                    rest,
                )
            }
        };
        child.get_descendant(rest)
    }

    /// Replace the node at `segments` with what `supplier` computes from the current one
    ///
    /// Only stored nodes accept replacements. Below a leaf nothing is stored and the
    /// synthesized Missing descendant is returned. No lock is held while the
    /// supplier runs; if the slot changes meanwhile the supplier is called again
    /// with the newer value.
    pub fn replace_descendant<F>(&self, segments: &[&str], supplier: F) -> Result<Node, VfsError>
    where
        F: FnMut(Option<&Node>) -> Node,
    {
        match self {
            Node::Root(node) | Node::Mutable(node) => {
                if segments.is_empty() {
                    Ok(self.clone())
                } else {
                    node.replace(segments, supplier)
                }
            }
            Node::CompleteDirectory(node) => {
                Err(VfsError::DetachedView(node.absolute_path().to_string()))
            }
            Node::RegularFile(_) | Node::Missing(_) => {
                if segments.is_empty() {
                    Err(VfsError::EmptyPath {
                        operation: "replace a leaf",
                    })
                } else {
                    Ok(self.get_descendant(segments))
                }
            }
        }
    }

    /// Drop whatever is known at `segments`
    ///
    /// Returns whether stored state changed; removing something already missing is a no-op.
    pub fn remove_descendant(&self, segments: &[&str]) -> Result<bool, VfsError> {
        if segments.is_empty() {
            return Err(VfsError::CannotRemoveCurrent);
        }
        match self {
            Node::Root(node) | Node::Mutable(node) => node.remove(segments),
            Node::CompleteDirectory(node) => {
                Err(VfsError::DetachedView(node.absolute_path().to_string()))
            }
            Node::RegularFile(_) | Node::Missing(_) => Ok(false),
        }
    }
}

/// Missing node for `first_path` extended by the remaining segments
pub(crate) fn missing_descendant(first_path: String, rest: &[&str]) -> Node {
    let absolute_path = rest
        .iter()
        .fold(first_path, |parent, segment| path::child_absolute_path(&parent, segment));
    Node::missing(absolute_path)
}
