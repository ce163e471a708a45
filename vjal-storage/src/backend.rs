//! Backend selection.

use std::path::PathBuf;
use vjal_config::{AppConfig, StateLocation};

/// Where a [`crate::StateStore`] keeps its database.
///
/// Chosen explicitly at startup; there is no global backend registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// A SQLite file at the given path. Parent directories are created.
    File(PathBuf),
    /// A private database in a temporary directory, removed when the store
    /// is dropped.
    Temporary,
}

impl From<StateLocation> for StoreBackend {
    fn from(location: StateLocation) -> Self {
        match location {
            StateLocation::File(path) => Self::File(path),
            StateLocation::Memory => Self::Temporary,
        }
    }
}

impl From<&AppConfig> for StoreBackend {
    fn from(config: &AppConfig) -> Self {
        config.state_location().into()
    }
}
