//! Encryption layer for VJAL.
//!
//! Protects proprietary assets at rest with keys bound to a license secret
//! and a device fingerprint:
//!
//! - [`derive_key`]: Argon2id over `secret`, salted with `fingerprint ‖ salt`
//! - [`encrypt`] / [`decrypt`]: ChaCha20-Poly1305 blobs laid out as
//!   `salt[16] ‖ nonce[12] ‖ sealed[n]`
//! - [`validate_hash`]: SHA-256 checksums for artifacts shipped in the clear
//!
//! All operations are synchronous and keep no shared state; they can be
//! called from any number of threads at once.

mod cipher;
mod error;
mod integrity;
mod key;

pub use cipher::{
    decrypt, encrypt, BlobCipher, EncryptedBlob, HEADER_SIZE, MIN_BLOB_SIZE, NONCE_SIZE, TAG_SIZE,
};
pub use error::{CryptoError, CryptoResult};
pub use integrity::{constant_time_eq, hash_bytes, validate_file_hash, validate_hash};
pub use key::{derive_key, DerivedKey, KdfParams, Salt, KEY_SIZE, SALT_SIZE};
