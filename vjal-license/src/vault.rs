//! Sealed proprietary assets on disk.
//!
//! Prompt templates and configuration payloads ship encrypted to the
//! licensed device. [`AssetVault`] re-checks the binding's expiry and hands
//! its material to the cipher; it never caches a derived key.

use crate::binding::LicenseBinding;
use crate::error::{LicenseError, LicenseResult};
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::{debug, instrument};
use vjal_crypto::BlobCipher;

/// Opens and seals assets bound to one license and device.
#[derive(Debug, Clone)]
pub struct AssetVault {
    binding: LicenseBinding,
    cipher: BlobCipher,
}

impl AssetVault {
    /// Creates a vault using the default KDF parameters.
    pub fn new(binding: LicenseBinding) -> Self {
        Self::with_cipher(binding, BlobCipher::default())
    }

    /// Creates a vault with an explicit cipher configuration.
    pub fn with_cipher(binding: LicenseBinding, cipher: BlobCipher) -> Self {
        Self { binding, cipher }
    }

    /// Returns the binding in use.
    pub fn binding(&self) -> &LicenseBinding {
        &self.binding
    }

    /// Encrypts `plaintext` into a blob.
    pub fn seal(&self, plaintext: &[u8]) -> LicenseResult<Vec<u8>> {
        self.binding.ensure_valid_at(Utc::now())?;
        Ok(self
            .cipher
            .encrypt(plaintext, self.binding.secret(), self.binding.fingerprint())?)
    }

    /// Decrypts a blob produced by [`AssetVault::seal`].
    pub fn open(&self, blob: &[u8]) -> LicenseResult<Vec<u8>> {
        self.binding.ensure_valid_at(Utc::now())?;
        Ok(self
            .cipher
            .decrypt(blob, self.binding.secret(), self.binding.fingerprint())?)
    }

    /// Seals `plaintext` and writes it to `path`.
    ///
    /// The file is written to a sibling temp file and renamed into place, so
    /// readers never observe a partial blob.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn seal_asset(&self, path: impl AsRef<Path>, plaintext: &[u8]) -> LicenseResult<()> {
        let path = path.as_ref();
        let blob = self.seal(plaintext)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(LicenseError::io(dir))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(LicenseError::io(dir))?;
        tmp.write_all(&blob).map_err(LicenseError::io(tmp.path()))?;
        tmp.as_file().sync_all().map_err(LicenseError::io(tmp.path()))?;
        tmp.persist(path).map_err(|e| LicenseError::Io {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        debug!(blob_len = blob.len(), "asset sealed");
        Ok(())
    }

    /// Reads and decrypts the asset at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open_asset(&self, path: impl AsRef<Path>) -> LicenseResult<Vec<u8>> {
        let path = path.as_ref();
        let blob = std::fs::read(path).map_err(LicenseError::io(path))?;
        self.open(&blob)
    }

    /// Serializes `value` as JSON and seals it to `path`.
    pub fn seal_json<T: Serialize + ?Sized>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> LicenseResult<()> {
        let json = serde_json::to_vec(value)?;
        self.seal_asset(path, &json)
    }

    /// Opens the asset at `path` and parses it as JSON.
    pub fn open_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> LicenseResult<T> {
        let plaintext = self.open_asset(path)?;
        Ok(serde_json::from_slice(&plaintext)?)
    }
}
