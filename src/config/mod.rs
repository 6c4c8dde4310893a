//! Configuration
//!
//! Layered configuration: built-in defaults, an optional TOML file, then
//! `SNAPTREE__*` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// When stored knowledge is discarded between builds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Keep the tree after a build finishes (default: true)
    #[serde(default = "default_true")]
    pub retain_between_builds: bool,

    /// Drop the tree when a build starts, e.g. when file changes cannot be watched
    #[serde(default)]
    pub clear_on_session_start: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            retain_between_builds: true,
            clear_on_session_start: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnaptreeConfig {
    #[serde(default)]
    pub retention: RetentionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
