//! Environment variable source: SNAPTREE prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::Map;

/// Add environment variable overlay to builder.
/// `SNAPTREE__RETENTION__RETAIN_BETWEEN_BUILDS=false` sets `retention.retain_between_builds`.
///
/// `vars` replaces the process environment when given.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    vars: Option<Map<String, String>>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("SNAPTREE")
            .separator("__")
            .try_parsing(true)
            .source(vars),
    );
    Ok(builder)
}
