//! Core types shared by the snapshot and tree modules.

use serde::{Deserialize, Serialize};

/// Hash: 256-bit blake3 digest identifying file content or directory structure
pub type Hash = [u8; 32];

/// Render a hash as lowercase hex
pub fn hash_to_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Kind of file-system entry a snapshot describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    RegularFile,
    Directory,
    Missing,
}
