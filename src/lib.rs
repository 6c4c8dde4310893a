//! Snaptree: Path-Indexed File-System Snapshot Cache
//!
//! Holds, for any path below a set of registered roots, either a complete immutable
//! snapshot or explicit partial knowledge, so a build tool can decide whether the
//! inputs and outputs of a unit of work changed without scanning the disk again.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod snapshot;
pub mod tree;
pub mod types;
pub mod vfs;

pub use error::VfsError;
pub use session::BuildSession;
pub use snapshot::{FileMetadata, FileSystemSnapshot};
pub use tree::Node;
pub use types::{FileType, Hash};
pub use vfs::VirtualFileSystem;
