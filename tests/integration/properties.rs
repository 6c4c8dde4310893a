use crate::integration::support::file_with_hash;
use proptest::prelude::*;
use snaptree::{FileSystemSnapshot, FileType, Node, VirtualFileSystem};
use std::collections::BTreeMap;

type Leaf = (String, String, String);

fn leaf_path((a, b, c): &Leaf) -> String {
    format!("/{}/{}/{}", a, b, c)
}

proptest! {
    #[test]
    fn stored_snapshots_read_back(
        leaves in prop::collection::btree_map(("[a-c]", "[a-c]", "[a-d]"), any::<u8>(), 1..24)
    ) {
        let vfs = VirtualFileSystem::new();
        for (leaf, hash) in &leaves {
            vfs.store(file_with_hash(&leaf_path(leaf), [*hash; 32])).unwrap();
        }
        for (leaf, hash) in &leaves {
            let stored = vfs.read(&leaf_path(leaf)).unwrap().unwrap();
            prop_assert_eq!(stored.file_type(), FileType::RegularFile);
            prop_assert_eq!(stored.hash(), [*hash; 32]);
        }
    }

    #[test]
    fn replacing_one_child_leaves_siblings_alone(
        hashes in prop::collection::vec(any::<u8>(), 2..12),
        target in any::<prop::sample::Index>(),
        new_hash in any::<u8>(),
    ) {
        let names: BTreeMap<String, u8> = hashes
            .iter()
            .enumerate()
            .map(|(i, hash)| (format!("f{}", i), *hash))
            .collect();
        let children = names
            .iter()
            .map(|(name, hash)| file_with_hash(&format!("/dir/{}", name), [*hash; 32]))
            .collect();
        let vfs = VirtualFileSystem::new();
        vfs.store(FileSystemSnapshot::directory("/dir", children).unwrap()).unwrap();

        let before: Vec<Node> = names
            .keys()
            .map(|name| vfs.get_descendant(&format!("/dir/{}", name)).unwrap())
            .collect();
        let target_name = format!("f{}", target.index(hashes.len()));
        let target_path = format!("/dir/{}", target_name);
        vfs.store(file_with_hash(&target_path, [new_hash; 32])).unwrap();

        prop_assert_eq!(vfs.read(&target_path).unwrap().unwrap().hash(), [new_hash; 32]);
        for (name, node) in names.keys().zip(before.iter()) {
            if *name != target_name {
                let after = vfs.get_descendant(&format!("/dir/{}", name)).unwrap();
                prop_assert!(after.ptr_eq(node));
            }
        }
    }
}
