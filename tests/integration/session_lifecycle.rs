use crate::integration::support::root_directory;
use snaptree::config::{RetentionConfig, SnaptreeConfig};
use snaptree::{BuildSession, FileType};
use std::thread;

#[test]
fn workers_share_the_session_tree() {
    let session = BuildSession::new(&SnaptreeConfig::default());
    session.begin_build();

    let vfs = session.vfs();
    thread::spawn(move || {
        vfs.store(root_directory()).unwrap();
    })
    .join()
    .unwrap();

    let x = session.vfs().read("/root/x").unwrap().unwrap();
    assert_eq!(x.file_type(), FileType::RegularFile);
    session.end_build();
    assert!(session.vfs().read("/root/x").unwrap().unwrap().file_type() == FileType::RegularFile);
}

#[test]
fn builds_without_retention_start_cold() {
    let config = SnaptreeConfig {
        retention: RetentionConfig {
            retain_between_builds: false,
            clear_on_session_start: false,
        },
        ..SnaptreeConfig::default()
    };
    let session = BuildSession::new(&config);

    session.begin_build();
    session.vfs().store(root_directory()).unwrap();
    session.end_build();

    session.begin_build();
    assert_eq!(
        session.vfs().read("/root/x").unwrap().unwrap().file_type(),
        FileType::Missing
    );
    assert_eq!(session.builds_started(), 2);
}
