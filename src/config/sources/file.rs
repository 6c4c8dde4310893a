//! TOML file source

use crate::error::VfsError;
use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use std::path::Path;

/// Add a required TOML file to builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, VfsError> {
    let name = path
        .to_str()
        .ok_or_else(|| VfsError::ConfigError(format!("Config path is not UTF-8: {:?}", path)))?;
    Ok(builder.add_source(File::new(name, FileFormat::Toml).required(true)))
}
