//! Error types for the encryption layer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The blob is malformed (too short to hold salt and nonce).
    #[error("invalid blob: {0}")]
    InvalidBlob(String),

    /// Tag verification failed: wrong secret/fingerprint or tampered data.
    #[error("authentication failed (wrong key material or tampered data)")]
    Authentication,

    /// Key derivation failed.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Digest of the content does not match the published checksum.
    #[error("hash mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },

    /// File access failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
