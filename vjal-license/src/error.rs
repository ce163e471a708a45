//! Error types for the licensing module.

use std::path::PathBuf;
use thiserror::Error;
use vjal_crypto::CryptoError;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The license file or a sealed asset could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// License JSON is malformed or missing required fields.
    #[error("invalid license payload: {0}")]
    InvalidPayload(String),

    /// License has expired.
    #[error("license expired on {0}")]
    Expired(String),

    /// License is pinned to a different device.
    #[error("license is bound to another device")]
    DeviceMismatch,

    /// A sealed asset could not be opened or produced.
    #[error("asset crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Asset content is not the expected JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LicenseError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
