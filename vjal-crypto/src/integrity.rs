//! Checksum validation for artifacts distributed in the clear.
//!
//! Independent of the encryption path: static payloads ship with a published
//! SHA-256 and are checked before use.

use crate::error::{CryptoError, CryptoResult};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::warn;

/// Computes the SHA-256 of `data` as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Verifies that `content` hashes to `expected_hex`.
///
/// The comparison covers the whole value and does not exit early on the
/// first differing byte. Upper-case hex is accepted.
pub fn validate_hash(content: &[u8], expected_hex: &str) -> CryptoResult<()> {
    let actual = hash_bytes(content);
    let expected = expected_hex.trim().to_ascii_lowercase();

    if constant_time_eq(actual.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        warn!(expected = %expected_hex, actual = %actual, "checksum mismatch");
        Err(CryptoError::Mismatch {
            expected: expected_hex.to_owned(),
            actual,
        })
    }
}

/// Reads the file at `path` and verifies it against `expected_hex`.
pub fn validate_file_hash(path: impl AsRef<Path>, expected_hex: &str) -> CryptoResult<()> {
    let path = path.as_ref();
    let content = std::fs::read(path).map_err(|source| CryptoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    validate_hash(&content, expected_hex)
}

/// Compares two byte strings without short-circuiting on content.
///
/// Length is not treated as secret.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-256 of the empty byte slice.
    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn hash_empty_input() {
        assert_eq!(hash_bytes(b""), EMPTY_SHA256);
    }

    #[test]
    fn hash_known_value() {
        let expected = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
        assert_eq!(hash_bytes(b"hello world"), expected);
    }

    #[test]
    fn uppercase_expected_accepted() {
        assert!(validate_hash(b"", &EMPTY_SHA256.to_uppercase()).is_ok());
    }

    #[test]
    fn constant_time_eq_basics() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
        assert!(constant_time_eq(b"", b""));
    }
}
