//! Build Session
//!
//! Scopes the virtual file system to the lifetime of a build tool session. Workers
//! share the tree through `vfs()`; the session decides when stored knowledge can
//! no longer be trusted and must be dropped.

use crate::config::{RetentionConfig, SnaptreeConfig};
use crate::vfs::VirtualFileSystem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

pub struct BuildSession {
    vfs: Arc<VirtualFileSystem>,
    retention: RetentionConfig,
    builds_started: AtomicU64,
}

impl BuildSession {
    pub fn new(config: &SnaptreeConfig) -> Self {
        Self::with_vfs(Arc::new(VirtualFileSystem::new()), config.retention.clone())
    }

    pub fn with_vfs(vfs: Arc<VirtualFileSystem>, retention: RetentionConfig) -> Self {
        Self {
            vfs,
            retention,
            builds_started: AtomicU64::new(0),
        }
    }

    /// Shared handle for build workers
    pub fn vfs(&self) -> Arc<VirtualFileSystem> {
        Arc::clone(&self.vfs)
    }

    pub fn retention(&self) -> &RetentionConfig {
        &self.retention
    }

    /// Mark the start of a build, returning its sequence number (starting at 1)
    pub fn begin_build(&self) -> u64 {
        let build = self.builds_started.fetch_add(1, Ordering::SeqCst) + 1;
        if self.retention.clear_on_session_start {
            self.vfs.clear();
        }
        info!(build, retained_roots = self.vfs.stored_roots().len(), "Build started");
        build
    }

    /// Mark the end of a build; drops the tree unless it is retained between builds
    pub fn end_build(&self) {
        if !self.retention.retain_between_builds {
            self.vfs.clear();
        }
        info!(
            retained = self.retention.retain_between_builds,
            "Build finished"
        );
    }

    /// Drop everything, e.g. after file-system changes that were not observed
    pub fn invalidate_all(&self) {
        info!("Invalidating all stored file-system state");
        self.vfs.clear();
    }

    pub fn builds_started(&self) -> u64 {
        self.builds_started.load(Ordering::SeqCst)
    }
}
