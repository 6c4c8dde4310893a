use snaptree::tree::hasher::hash_content;
use snaptree::{FileMetadata, FileSystemSnapshot, Hash};

pub fn file(path: &str, content: &[u8]) -> FileSystemSnapshot {
    FileSystemSnapshot::regular_file(
        path,
        hash_content(content),
        FileMetadata {
            length: content.len() as u64,
            last_modified: 1_700_000_000_000,
        },
    )
}

pub fn file_with_hash(path: &str, hash: Hash) -> FileSystemSnapshot {
    FileSystemSnapshot::regular_file(path, hash, FileMetadata::default())
}

/// `/root` holding files `x` and `y`
pub fn root_directory() -> FileSystemSnapshot {
    FileSystemSnapshot::directory("/root", vec![file("/root/x", b"H1"), file("/root/y", b"H2")])
        .unwrap()
}
