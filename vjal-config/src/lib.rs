//! Application configuration for VJAL.
//!
//! Configuration is read from a JSON file and then overridden field by field
//! from `VJAL_*` environment variables. Only the settings the license and
//! storage layers consume live here; HTTP, rendering and LLM settings belong
//! to the outer application.

mod error;
mod logging;
pub mod telemetry;

pub use error::{ConfigError, ConfigResult};
pub use logging::init_logging;
pub use telemetry::describe_metrics;

use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

/// Sentinel value of `state_db` selecting a volatile in-memory store.
pub const MEMORY_STATE_DB: &str = ":memory:";

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[serde(alias = "dev")]
    Development,
    #[serde(alias = "prod")]
    Production,
}

impl std::str::FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(()),
        }
    }
}

/// Where the state store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateLocation {
    /// A SQLite database file.
    File(PathBuf),
    /// A private in-memory database, discarded when the store is dropped.
    Memory,
}

/// Settings loaded from `config.json` plus environment overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Deployment environment.
    #[serde(default)]
    pub env: Environment,
    /// Path to the JSON license artifact.
    #[serde(default)]
    pub license_path: PathBuf,
    /// Directory for generated output; also the default home of the state db.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Directory holding sealed assets (prompt templates and the like).
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,
    /// Explicit state database path, or `:memory:`.
    #[serde(default)]
    pub state_db: Option<String>,
    /// `tracing` filter directive used by [`init_logging`].
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Reads the config file at `path`, applies process environment
    /// overrides and validates required fields.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::load_with_env(path, |var| std::env::var(var).ok())
    }

    /// Like [`AppConfig::load`] but with an injectable environment lookup.
    pub fn load_with_env<F>(path: impl AsRef<Path>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let started = Instant::now();
        let result = Self::read_and_merge(path, lookup);
        histogram!(telemetry::CONFIG_LOAD_DURATION).record(started.elapsed().as_secs_f64());

        match &result {
            Ok(config) => debug!(path = %path.display(), env = ?config.env, "configuration loaded"),
            Err(err) => {
                counter!(telemetry::CONFIG_LOAD_ERRORS).increment(1);
                warn!(path = %path.display(), error = %err, "configuration rejected");
            }
        }
        result
    }

    fn read_and_merge<F>(path: &Path, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&data)?;
        config.apply_env_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a config document without touching the environment.
    pub fn from_json(data: &[u8]) -> ConfigResult<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Overrides fields from `VJAL_*` variables returned by `lookup`.
    /// Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.is_empty());

        if let Some(v) = get("VJAL_ENV") {
            self.env = v
                .parse()
                .map_err(|()| ConfigError::InvalidOverride { var: "VJAL_ENV", value: v })?;
        }
        if let Some(v) = get("VJAL_LICENSE_PATH") {
            self.license_path = PathBuf::from(v);
        }
        if let Some(v) = get("VJAL_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = get("VJAL_ASSET_DIR") {
            self.asset_dir = PathBuf::from(v);
        }
        if let Some(v) = get("VJAL_STATE_DB") {
            self.state_db = Some(v);
        }
        if let Some(v) = get("VJAL_LOG") {
            self.log_filter = v;
        }
        Ok(())
    }

    /// Checks that required fields are present.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.license_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing("licensePath"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Missing("outputDir"));
        }
        Ok(())
    }

    /// Resolves where the state store should live.
    ///
    /// Defaults to `<output_dir>/state.db`.
    #[must_use]
    pub fn state_location(&self) -> StateLocation {
        match self.state_db.as_deref() {
            Some(MEMORY_STATE_DB) => StateLocation::Memory,
            Some(path) => StateLocation::File(PathBuf::from(path)),
            None => StateLocation::File(self.output_dir.join("state.db")),
        }
    }

    /// Resolves an asset name against `asset_dir`.
    #[must_use]
    pub fn asset_path(&self, name: &str) -> PathBuf {
        self.asset_dir.join(name)
    }
}
