//! Source composition.

pub mod service;

use crate::config::SnaptreeConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the serialized defaults so every key has a value.
pub(crate) fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Config::try_from(&SnaptreeConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}
