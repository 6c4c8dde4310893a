//! Logging System
//!
//! Structured logging using the `tracing` crate. The tree itself only emits events;
//! a host process that wants them printed calls `init_logging` once at startup.

use crate::error::VfsError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding a full `EnvFilter` directive; wins over config
pub const LOG_FILTER_ENV: &str = "SNAPTREE_LOG";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path, required when output includes file
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Install the global subscriber
///
/// A subscriber installed earlier (by the host or a previous call) is left in place.
pub fn init_logging(config: &LoggingConfig) -> Result<(), VfsError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let json = parse_format(&config.format)?;
    let writer = build_writer(config)?;

    let layer = fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);
    let base_subscriber = Registry::default().with(filter);

    let installed = if json {
        base_subscriber.with(layer.json()).try_init()
    } else {
        let ansi = config.color && config.output != "file";
        base_subscriber.with(layer.with_ansi(ansi)).try_init()
    };
    if installed.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
    Ok(())
}

/// Build environment filter from `SNAPTREE_LOG` or config
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, VfsError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_FILTER_ENV) {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(&config.level);
    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| VfsError::ConfigError(format!("Invalid log directive: {}", e)))?,
        );
    }
    Ok(filter)
}

/// `true` for json, `false` for text
fn parse_format(format: &str) -> Result<bool, VfsError> {
    match format {
        "json" => Ok(true),
        "text" => Ok(false),
        _ => Err(VfsError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        ))),
    }
}

fn build_writer(config: &LoggingConfig) -> Result<BoxMakeWriter, VfsError> {
    match config.output.as_str() {
        "stdout" => Ok(BoxMakeWriter::new(std::io::stdout)),
        "stderr" => Ok(BoxMakeWriter::new(std::io::stderr)),
        "file" => Ok(BoxMakeWriter::new(open_log_file(config)?)),
        "file+stderr" => Ok(BoxMakeWriter::new(
            open_log_file(config)?.and(std::io::stderr),
        )),
        other => Err(VfsError::ConfigError(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr', 'file' or 'file+stderr')",
            other
        ))),
    }
}

fn open_log_file(config: &LoggingConfig) -> Result<Mutex<std::fs::File>, VfsError> {
    let log_file = config.file.as_ref().ok_or_else(|| {
        VfsError::ConfigError("Log output includes file but no log file is set".to_string())
    })?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            VfsError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| {
            VfsError::ConfigError(format!("Failed to open log file {:?}: {}", log_file, e))
        })?;
    Ok(Mutex::new(file))
}
