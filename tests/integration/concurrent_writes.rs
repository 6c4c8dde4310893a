use crate::integration::support::{file, file_with_hash};
use snaptree::tree::hasher::hash_content;
use snaptree::{FileSystemSnapshot, Node, VirtualFileSystem};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Barrier};
use std::thread;
use std::time::Duration;

const WRITERS: usize = 16;

#[test]
fn racing_writers_install_exactly_one_result() {
    let vfs = Arc::new(VirtualFileSystem::new());
    let barrier = Arc::new(Barrier::new(WRITERS));
    let invocations = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];
    for i in 0..WRITERS {
        let vfs = vfs.clone();
        let barrier = barrier.clone();
        let invocations = invocations.clone();
        handles.push(thread::spawn(move || {
            barrier.wait();
            vfs.replace_descendant("/a/b", |_| {
                invocations.fetch_add(1, Ordering::SeqCst);
                Node::from_snapshot(file_with_hash("/a/b", [i as u8; 32]))
            })
            .unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // Suppliers that lost a race were re-run against the newer value
    assert!(invocations.load(Ordering::SeqCst) >= WRITERS);

    let stored = vfs.read("/a/b").unwrap().unwrap();
    let candidates: HashSet<[u8; 32]> = (0..WRITERS).map(|i| [i as u8; 32]).collect();
    assert!(candidates.contains(&stored.hash()));

    let stats = vfs.stats();
    assert_eq!(stats.mutable_nodes, 1);
    assert_eq!(stats.snapshot_entries, 1);
}

#[test]
fn updates_derived_from_current_value_are_never_lost() {
    let vfs = Arc::new(VirtualFileSystem::new());
    let barrier = Arc::new(Barrier::new(WRITERS));

    let mut handles = vec![];
    for _ in 0..WRITERS {
        let vfs = vfs.clone();
        let barrier = barrier.clone();
        handles.push(thread::spawn(move || {
            barrier.wait();
            vfs.replace_descendant("/slot/counter", |current| {
                let count = current
                    .and_then(|node| node.snapshot().ok().flatten())
                    .map_or(0, |snapshot| snapshot.hash()[0]);
                Node::from_snapshot(file_with_hash("/slot/counter", [count + 1; 32]))
            })
            .unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let stored = vfs.read("/slot/counter").unwrap().unwrap();
    assert_eq!(stored.hash(), [WRITERS as u8; 32]);
}

#[test]
fn disjoint_children_of_one_directory_are_all_kept() {
    let vfs = Arc::new(VirtualFileSystem::new());
    let children = (0..WRITERS)
        .map(|i| file(&format!("/shared/c{}", i), b"original"))
        .collect();
    vfs.store(FileSystemSnapshot::directory("/shared", children).unwrap())
        .unwrap();

    let barrier = Arc::new(Barrier::new(WRITERS));
    let mut handles = vec![];
    for i in 0..WRITERS {
        let vfs = vfs.clone();
        let barrier = barrier.clone();
        handles.push(thread::spawn(move || {
            let path = format!("/shared/c{}", i);
            barrier.wait();
            vfs.store(file_with_hash(&path, [i as u8 + 1; 32])).unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..WRITERS {
        let stored = vfs.read(&format!("/shared/c{}", i)).unwrap().unwrap();
        assert_eq!(stored.hash(), [i as u8 + 1; 32], "lost update for c{}", i);
    }
}

#[test]
fn readers_see_untouched_siblings_during_writes() {
    let vfs = Arc::new(VirtualFileSystem::new());
    vfs.store(
        FileSystemSnapshot::directory(
            "/root",
            vec![file("/root/x", b"H1"), file("/root/y", b"H2")],
        )
        .unwrap(),
    )
    .unwrap();
    let expected = vfs.read("/root/y").unwrap().unwrap().hash();

    let writer = {
        let vfs = vfs.clone();
        thread::spawn(move || {
            for round in 0..200u32 {
                let content = round.to_le_bytes();
                vfs.store(file("/root/x", &content)).unwrap();
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let vfs = vfs.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let y = vfs.read("/root/y").unwrap().unwrap();
                    assert_eq!(y.hash(), expected);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}

/// Runs `other` while a supplier for `path` is in progress
///
/// Returns whether `other` finished before the supplier gave up waiting for it.
fn finishes_during_slow_supplier<F>(vfs: &VirtualFileSystem, path: &str, other: F) -> bool
where
    F: FnOnce() + Send,
{
    let barrier = Barrier::new(2);
    let (done_tx, done_rx) = mpsc::channel();
    let mut finished = false;

    thread::scope(|scope| {
        let barrier = &barrier;
        scope.spawn(move || {
            barrier.wait();
            other();
            let _ = done_tx.send(());
        });

        let mut waited = false;
        vfs.replace_descendant(path, |_| {
            if !waited {
                waited = true;
                barrier.wait();
                finished = done_rx.recv_timeout(Duration::from_secs(5)).is_ok();
            }
            Node::from_snapshot(file(path, b"slow"))
        })
        .unwrap();
    });
    finished
}

fn two_subdirectories() -> VirtualFileSystem {
    let vfs = VirtualFileSystem::new();
    vfs.store(FileSystemSnapshot::directory("/root/left", vec![file("/root/left/a", b"a")]).unwrap())
        .unwrap();
    vfs.store(FileSystemSnapshot::directory("/root/right", vec![file("/root/right/b", b"b")]).unwrap())
        .unwrap();
    vfs
}

#[test]
fn readers_are_not_held_up_by_a_slow_supplier() {
    let vfs = two_subdirectories();
    let finished = finishes_during_slow_supplier(&vfs, "/root/left/a", || {
        let a = vfs.read("/root/left/a").unwrap().unwrap();
        assert_eq!(a.hash(), hash_content(b"a"));
        assert!(vfs.get_descendant("/root/left").unwrap().is_snapshot());
    });
    assert!(finished, "reader waited for the supplier");
    assert_eq!(
        vfs.read("/root/left/a").unwrap().unwrap().hash(),
        hash_content(b"slow")
    );
}

#[test]
fn sibling_subdirectory_stays_writable_during_a_slow_supplier() {
    let vfs = two_subdirectories();
    let finished = finishes_during_slow_supplier(&vfs, "/root/left/a", || {
        vfs.store(file("/root/right/b", b"b2")).unwrap();
        assert_eq!(
            vfs.read("/root/right/b").unwrap().unwrap().hash(),
            hash_content(b"b2")
        );
    });
    assert!(finished, "sibling writer waited for the supplier");
    assert_eq!(
        vfs.read("/root/left/a").unwrap().unwrap().hash(),
        hash_content(b"slow")
    );
    assert_eq!(
        vfs.read("/root/right/b").unwrap().unwrap().hash(),
        hash_content(b"b2")
    );
}
