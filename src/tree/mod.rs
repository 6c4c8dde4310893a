//! Snapshot Tree
//!
//! Path-indexed tree of file-system knowledge. Stored mutable nodes hang off a
//! single root; below them, complete directory snapshots are navigated through
//! transient views and promoted to stored nodes only when something beneath them
//! changes.

pub mod directory;
pub mod hasher;
pub mod mutable;
pub mod node;
pub mod path;

pub use directory::CompleteDirectoryNode;
pub use mutable::{MutableNode, TreeStats};
pub use node::{MissingFileNode, Node, RegularFileNode};
