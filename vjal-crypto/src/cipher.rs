//! Blob encryption using ChaCha20-Poly1305.
//!
//! Every blob is self-contained: `salt[16] ‖ nonce[12] ‖ sealed[n]`, where
//! `sealed` is the ciphertext with the 16-byte Poly1305 tag appended. There
//! is no version byte; the layout and the default [`KdfParams`] are fixed.

use crate::error::{CryptoError, CryptoResult};
use crate::key::{derive_key, KdfParams, Salt, SALT_SIZE};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use tracing::{debug, instrument};

/// Size of nonce in bytes (96 bits for ChaCha20-Poly1305).
pub const NONCE_SIZE: usize = 12;

/// Size of authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Size of the fixed-width `salt ‖ nonce` prefix.
pub const HEADER_SIZE: usize = SALT_SIZE + NONCE_SIZE;

/// Smallest blob `encrypt` can produce (empty plaintext).
pub const MIN_BLOB_SIZE: usize = HEADER_SIZE + TAG_SIZE;

/// A parsed blob. Produced once by encryption, consumed by decryption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedBlob {
    /// Per-blob KDF salt.
    pub salt: Salt,
    /// The nonce used for encryption (unique per encryption).
    pub nonce: [u8; NONCE_SIZE],
    /// The encrypted ciphertext (includes auth tag).
    pub sealed: Vec<u8>,
}

impl EncryptedBlob {
    /// Splits a raw blob into its fixed-width fields.
    ///
    /// Only the header length is checked here; a truncated tag is caught by
    /// authentication.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(CryptoError::InvalidBlob(format!(
                "blob is {} bytes, need at least {HEADER_SIZE}",
                bytes.len()
            )));
        }

        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&bytes[..SALT_SIZE]);
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[SALT_SIZE..HEADER_SIZE]);

        Ok(Self {
            salt: Salt::from_bytes(salt),
            nonce,
            sealed: bytes[HEADER_SIZE..].to_vec(),
        })
    }

    /// Serializes to the on-disk layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(self.salt.as_bytes());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.sealed);
        out
    }

    /// Returns the total serialized size.
    pub fn len(&self) -> usize {
        HEADER_SIZE + self.sealed.len()
    }

    /// Returns true if the sealed payload is empty.
    pub fn is_empty(&self) -> bool {
        self.sealed.is_empty()
    }
}

/// Seals and opens blobs bound to a (secret, fingerprint) pair.
///
/// Stateless apart from the KDF parameters; no key is cached between calls.
#[derive(Clone, Debug, Default)]
pub struct BlobCipher {
    params: KdfParams,
}

impl BlobCipher {
    /// Creates a cipher with explicit KDF parameters.
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    /// Returns the KDF parameters in use.
    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Encrypts `plaintext` and returns the parsed blob.
    #[instrument(skip_all, fields(plaintext_len = plaintext.len()))]
    pub fn seal(
        &self,
        plaintext: &[u8],
        secret: &str,
        fingerprint: &[u8],
    ) -> CryptoResult<EncryptedBlob> {
        let salt = Salt::random();
        let mut nonce = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut nonce);

        let key = derive_key(secret, fingerprint, &salt, &self.params)?;
        let cipher = ChaCha20Poly1305::new(key.as_bytes().into());

        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;

        debug!(sealed_len = sealed.len(), "blob sealed");
        Ok(EncryptedBlob { salt, nonce, sealed })
    }

    /// Decrypts a parsed blob, verifying its tag.
    #[instrument(skip_all, fields(sealed_len = blob.sealed.len()))]
    pub fn open(
        &self,
        blob: &EncryptedBlob,
        secret: &str,
        fingerprint: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let key = derive_key(secret, fingerprint, &blob.salt, &self.params)?;
        let cipher = ChaCha20Poly1305::new(key.as_bytes().into());

        cipher
            .decrypt(Nonce::from_slice(&blob.nonce), blob.sealed.as_ref())
            .map_err(|_| CryptoError::Authentication)
    }

    /// Encrypts `plaintext` into `salt ‖ nonce ‖ sealed`.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        secret: &str,
        fingerprint: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        Ok(self.seal(plaintext, secret, fingerprint)?.to_bytes())
    }

    /// Decrypts a blob produced by [`BlobCipher::encrypt`].
    pub fn decrypt(&self, blob: &[u8], secret: &str, fingerprint: &[u8]) -> CryptoResult<Vec<u8>> {
        let blob = EncryptedBlob::from_bytes(blob)?;
        self.open(&blob, secret, fingerprint)
    }
}

/// Encrypts `plaintext` with a key bound to `secret` and `fingerprint`,
/// using the default KDF parameters.
pub fn encrypt(plaintext: &[u8], secret: &str, fingerprint: &[u8]) -> CryptoResult<Vec<u8>> {
    BlobCipher::default().encrypt(plaintext, secret, fingerprint)
}

/// Decrypts a blob produced by [`encrypt`].
///
/// Fails with [`CryptoError::InvalidBlob`] if the blob is shorter than the
/// salt and nonce, and with [`CryptoError::Authentication`] on any tag
/// failure. No plaintext is returned on failure.
pub fn decrypt(blob: &[u8], secret: &str, fingerprint: &[u8]) -> CryptoResult<Vec<u8>> {
    BlobCipher::default().decrypt(blob, secret, fingerprint)
}
