//! Error types for configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`crate::AppConfig`].
    #[error("invalid JSON in config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required field is empty after env overrides.
    #[error("{0} is required in config")]
    Missing(&'static str),

    /// An environment override could not be applied.
    #[error("invalid value for {var}: {value}")]
    InvalidOverride { var: &'static str, value: String },
}
