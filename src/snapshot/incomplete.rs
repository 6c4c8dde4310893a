//! Partial snapshots used while a snapshot is being built
//!
//! Neither form has a hash. They may answer whether a descendant is known to be
//! missing, but must never be stored as the canonical snapshot for a path.

use super::{FileSystemSnapshot, MissingFileSnapshot};
use crate::error::VfsError;
use crate::tree::path;
use crate::types::{FileType, Hash};

/// Directory whose immediate children are known but whose deeper structure is not
#[derive(Debug, Clone)]
pub struct ShallowDirectorySnapshot {
    absolute_path: String,
    name: String,
    direct_children: Vec<FileSystemSnapshot>,
}

impl ShallowDirectorySnapshot {
    pub fn new(absolute_path: impl Into<String>, direct_children: Vec<FileSystemSnapshot>) -> Self {
        let absolute_path = absolute_path.into();
        let name = path::file_name(&absolute_path).to_string();
        Self {
            absolute_path,
            name,
            direct_children,
        }
    }

    pub fn children(&self) -> &[FileSystemSnapshot] {
        &self.direct_children
    }
}

/// Entry whose type is known but whose content has not been hashed
#[derive(Debug, Clone)]
pub struct MetadataOnlySnapshot {
    absolute_path: String,
    name: String,
    file_type: FileType,
}

impl MetadataOnlySnapshot {
    pub fn new(absolute_path: impl Into<String>, file_type: FileType) -> Self {
        let absolute_path = absolute_path.into();
        let name = path::file_name(&absolute_path).to_string();
        Self {
            absolute_path,
            name,
            file_type,
        }
    }
}

/// Either partial form
#[derive(Debug, Clone)]
pub enum IncompleteSnapshot {
    ShallowDirectory(ShallowDirectorySnapshot),
    MetadataOnly(MetadataOnlySnapshot),
}

impl IncompleteSnapshot {
    pub fn file_type(&self) -> FileType {
        match self {
            IncompleteSnapshot::ShallowDirectory(_) => FileType::Directory,
            IncompleteSnapshot::MetadataOnly(snapshot) => snapshot.file_type,
        }
    }

    pub fn absolute_path(&self) -> &str {
        match self {
            IncompleteSnapshot::ShallowDirectory(snapshot) => &snapshot.absolute_path,
            IncompleteSnapshot::MetadataOnly(snapshot) => &snapshot.absolute_path,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            IncompleteSnapshot::ShallowDirectory(snapshot) => &snapshot.name,
            IncompleteSnapshot::MetadataOnly(snapshot) => &snapshot.name,
        }
    }

    pub fn hash(&self) -> Result<Hash, VfsError> {
        Err(self.unsupported("hash"))
    }

    pub fn is_content_up_to_date(&self, _other: &FileSystemSnapshot) -> Result<bool, VfsError> {
        Err(self.unsupported("compare content"))
    }

    /// Snapshot for a descendant, when this partial knowledge is enough to tell
    ///
    /// `offset` is the byte position in `file_path` right after this entry's path.
    /// Returns a Missing snapshot when the descendant cannot exist, `None` when
    /// the descendant's state is unknown.
    pub fn child_snapshot(&self, file_path: &str, offset: usize) -> Option<MissingFileSnapshot> {
        match self {
            IncompleteSnapshot::MetadataOnly(snapshot) => match snapshot.file_type {
                FileType::RegularFile | FileType::Missing => {
                    Some(MissingFileSnapshot::new(file_path))
                }
                FileType::Directory => None,
            },
            IncompleteSnapshot::ShallowDirectory(snapshot) => {
                let known = snapshot
                    .direct_children
                    .iter()
                    .any(|child| path::is_child_of_or_this(file_path, offset, child.name()));
                if known {
                    None
                } else {
                    Some(MissingFileSnapshot::new(file_path))
                }
            }
        }
    }

    fn unsupported(&self, operation: &'static str) -> VfsError {
        VfsError::IncompleteSnapshot {
            operation,
            file_type: self.file_type(),
            path: self.absolute_path().to_string(),
        }
    }
}
