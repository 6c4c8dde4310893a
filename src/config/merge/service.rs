//! MergeService: orchestrates sources and deserializes to SnaptreeConfig.

use super::builder_with_defaults;
use crate::config::sources::{environment, file};
use crate::config::SnaptreeConfig;
use crate::error::VfsError;
use config::Map;
use std::path::Path;
use tracing::debug;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> config file -> environment (highest).
    pub fn load(path: Option<&Path>) -> Result<SnaptreeConfig, VfsError> {
        Self::load_with_env(path, None)
    }

    /// Same precedence, reading `SNAPTREE__*` keys from `vars` instead of the process environment
    pub fn load_with_env(
        path: Option<&Path>,
        vars: Option<Map<String, String>>,
    ) -> Result<SnaptreeConfig, VfsError> {
        let builder = builder_with_defaults()?;
        let builder = match path {
            Some(path) => file::add_to_builder(builder, path)?,
            None => builder,
        };
        let builder = environment::add_to_builder(builder, vars)?;

        let config: SnaptreeConfig = builder.build()?.try_deserialize()?;
        debug!(file = ?path, "Loaded configuration");
        Ok(config)
    }
}
