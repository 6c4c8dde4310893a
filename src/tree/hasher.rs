//! Hash computation for snapshots

use crate::types::Hash;
use std::sync::OnceLock;

/// Hash raw file content
pub fn hash_content(content: &[u8]) -> Hash {
    *blake3::hash(content).as_bytes()
}

/// Signature shared by every missing entry
///
/// All Missing snapshots compare equal by hash, whatever their path.
pub fn missing_file_signature() -> Hash {
    static SIGNATURE: OnceLock<Hash> = OnceLock::new();
    *SIGNATURE.get_or_init(|| *blake3::hash(b"snaptree:missing-file").as_bytes())
}

/// Compute the aggregate hash of a directory from its children
///
/// Children must already be ordered by name. Each child contributes its name
/// and hash, length-prefixed so that name boundaries cannot be shifted.
pub fn compute_directory_hash<'a, I>(children: I) -> Hash
where
    I: IntoIterator<Item = (&'a str, Hash)>,
{
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"snaptree:directory");
    for (name, child_hash) in children {
        hasher.update(&(name.len() as u64).to_le_bytes());
        hasher.update(name.as_bytes());
        hasher.update(&child_hash);
    }
    *hasher.finalize().as_bytes()
}
