//! Error types for the snapshot tree.

use crate::types::FileType;
use thiserror::Error;

/// Errors raised by tree and snapshot operations
///
/// Every variant except `ConfigError` marks a contract violation by the caller:
/// these are surfaced immediately and never retried.
#[derive(Debug, Error)]
pub enum VfsError {
    #[error("Cannot {operation} with an empty path")]
    EmptyPath { operation: &'static str },

    #[error("Cannot remove the current node")]
    CannotRemoveCurrent,

    #[error("Root does not have a path")]
    RootHasNoPath,

    #[error("Root does not have a snapshot")]
    RootHasNoSnapshot,

    #[error("Cannot mutate below {0}: snapshot view is not attached to a stored node")]
    DetachedView(String),

    #[error("Path is not absolute: {0}")]
    NotAbsolute(String),

    #[error("Duplicate child '{name}' in directory snapshot {directory}")]
    DuplicateChild { directory: String, name: String },

    #[error("Child {child} does not lie directly inside directory snapshot {directory}")]
    ChildOutsideDirectory { directory: String, child: String },

    #[error("Operation '{operation}' is not supported on incomplete {file_type:?} snapshot {path}")]
    IncompleteSnapshot {
        operation: &'static str,
        file_type: FileType,
        path: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for VfsError {
    fn from(err: config::ConfigError) -> Self {
        VfsError::ConfigError(err.to_string())
    }
}
