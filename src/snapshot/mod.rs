//! File-system snapshots
//!
//! Immutable descriptions of file-system entries, produced by the snapshotting
//! collaborator and handed to the tree. Snapshots are shared through `Arc` so that
//! views synthesized from a directory never copy their children.

pub mod incomplete;

pub use incomplete::{IncompleteSnapshot, MetadataOnlySnapshot, ShallowDirectorySnapshot};

use crate::error::VfsError;
use crate::tree::hasher::{compute_directory_hash, missing_file_signature};
use crate::tree::path;
use crate::types::{hash_to_hex, FileType, Hash};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Metadata captured alongside a regular file's content hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileMetadata {
    pub length: u64,
    /// Milliseconds since the Unix epoch
    pub last_modified: u64,
}

/// Regular file with known content hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegularFileSnapshot {
    absolute_path: String,
    name: String,
    content_hash: Hash,
    metadata: FileMetadata,
}

impl RegularFileSnapshot {
    pub fn new(absolute_path: impl Into<String>, content_hash: Hash, metadata: FileMetadata) -> Self {
        let absolute_path = absolute_path.into();
        let name = path::file_name(&absolute_path).to_string();
        Self {
            absolute_path,
            name,
            content_hash,
            metadata,
        }
    }

    pub fn absolute_path(&self) -> &str {
        &self.absolute_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash(&self) -> Hash {
        self.content_hash
    }

    pub fn metadata(&self) -> FileMetadata {
        self.metadata
    }
}

/// Entry known not to exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFileSnapshot {
    absolute_path: String,
    name: String,
}

impl MissingFileSnapshot {
    pub fn new(absolute_path: impl Into<String>) -> Self {
        let absolute_path = absolute_path.into();
        let name = path::file_name(&absolute_path).to_string();
        Self {
            absolute_path,
            name,
        }
    }

    pub fn absolute_path(&self) -> &str {
        &self.absolute_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash(&self) -> Hash {
        missing_file_signature()
    }
}

/// Directory with its complete subtree captured
///
/// Children are kept ordered by name and indexed for single-segment lookup.
#[derive(Debug)]
pub struct DirectorySnapshot {
    absolute_path: String,
    name: String,
    children: Vec<FileSystemSnapshot>,
    index: HashMap<String, usize>,
    hash: Hash,
}

impl DirectorySnapshot {
    /// Build a directory snapshot, deriving its hash from the children
    pub fn new(
        absolute_path: impl Into<String>,
        children: Vec<FileSystemSnapshot>,
    ) -> Result<Self, VfsError> {
        let mut snapshot = Self::with_hash(absolute_path, children, [0u8; 32])?;
        snapshot.hash = compute_directory_hash(
            snapshot
                .children
                .iter()
                .map(|child| (child.name(), child.hash())),
        );
        Ok(snapshot)
    }

    /// Build a directory snapshot with a hash computed by the caller
    pub fn with_hash(
        absolute_path: impl Into<String>,
        mut children: Vec<FileSystemSnapshot>,
        hash: Hash,
    ) -> Result<Self, VfsError> {
        let absolute_path = absolute_path.into();
        children.sort_by(|a, b| a.name().cmp(b.name()));

        let mut index = HashMap::with_capacity(children.len());
        for (position, child) in children.iter().enumerate() {
            if !path::is_direct_child(&absolute_path, child.absolute_path()) {
                return Err(VfsError::ChildOutsideDirectory {
                    directory: absolute_path,
                    child: child.absolute_path().to_string(),
                });
            }
            if index.insert(child.name().to_string(), position).is_some() {
                return Err(VfsError::DuplicateChild {
                    directory: absolute_path,
                    name: child.name().to_string(),
                });
            }
        }

        let name = path::file_name(&absolute_path).to_string();
        Ok(Self {
            absolute_path,
            name,
            children,
            index,
            hash,
        })
    }

    pub fn absolute_path(&self) -> &str {
        &self.absolute_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// Children ordered by name
    pub fn children(&self) -> &[FileSystemSnapshot] {
        &self.children
    }

    /// Direct child with the given name
    pub fn child(&self, name: &str) -> Option<&FileSystemSnapshot> {
        self.index.get(name).map(|&position| &self.children[position])
    }
}

/// A complete snapshot of one file-system location
#[derive(Debug, Clone)]
pub enum FileSystemSnapshot {
    RegularFile(Arc<RegularFileSnapshot>),
    Directory(Arc<DirectorySnapshot>),
    Missing(Arc<MissingFileSnapshot>),
}

impl FileSystemSnapshot {
    pub fn regular_file(
        absolute_path: impl Into<String>,
        content_hash: Hash,
        metadata: FileMetadata,
    ) -> Self {
        FileSystemSnapshot::RegularFile(Arc::new(RegularFileSnapshot::new(
            absolute_path,
            content_hash,
            metadata,
        )))
    }

    pub fn directory(
        absolute_path: impl Into<String>,
        children: Vec<FileSystemSnapshot>,
    ) -> Result<Self, VfsError> {
        Ok(FileSystemSnapshot::Directory(Arc::new(DirectorySnapshot::new(
            absolute_path,
            children,
        )?)))
    }

    pub fn missing(absolute_path: impl Into<String>) -> Self {
        FileSystemSnapshot::Missing(Arc::new(MissingFileSnapshot::new(absolute_path)))
    }

    pub fn file_type(&self) -> FileType {
        match self {
            FileSystemSnapshot::RegularFile(_) => FileType::RegularFile,
            FileSystemSnapshot::Directory(_) => FileType::Directory,
            FileSystemSnapshot::Missing(_) => FileType::Missing,
        }
    }

    pub fn absolute_path(&self) -> &str {
        match self {
            FileSystemSnapshot::RegularFile(file) => file.absolute_path(),
            FileSystemSnapshot::Directory(directory) => directory.absolute_path(),
            FileSystemSnapshot::Missing(missing) => missing.absolute_path(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FileSystemSnapshot::RegularFile(file) => file.name(),
            FileSystemSnapshot::Directory(directory) => directory.name(),
            FileSystemSnapshot::Missing(missing) => missing.name(),
        }
    }

    pub fn hash(&self) -> Hash {
        match self {
            FileSystemSnapshot::RegularFile(file) => file.hash(),
            FileSystemSnapshot::Directory(directory) => directory.hash(),
            FileSystemSnapshot::Missing(missing) => missing.hash(),
        }
    }

    /// Equal by content: same type and same hash
    pub fn is_content_up_to_date(&self, other: &FileSystemSnapshot) -> bool {
        self.file_type() == other.file_type() && self.hash() == other.hash()
    }

    /// Whether both values share the same underlying snapshot allocation
    pub fn same_snapshot(&self, other: &FileSystemSnapshot) -> bool {
        match (self, other) {
            (FileSystemSnapshot::RegularFile(a), FileSystemSnapshot::RegularFile(b)) => {
                Arc::ptr_eq(a, b)
            }
            (FileSystemSnapshot::Directory(a), FileSystemSnapshot::Directory(b)) => {
                Arc::ptr_eq(a, b)
            }
            (FileSystemSnapshot::Missing(a), FileSystemSnapshot::Missing(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for FileSystemSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {} ({})",
            self.file_type(),
            self.absolute_path(),
            hash_to_hex(&self.hash())
        )
    }
}
