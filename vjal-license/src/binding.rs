//! The (secret, fingerprint) pair handed to the cipher.

use crate::device::DeviceFingerprint;
use crate::error::{LicenseError, LicenseResult};
use crate::license::License;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Key material vetted against a license: the license secret, the device
/// fingerprint and the license expiry.
///
/// Never serialized; `Debug` redacts the secret and fingerprint, and both
/// are wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct LicenseBinding {
    secret: String,
    fingerprint: Vec<u8>,
    #[zeroize(skip)]
    expires_at: DateTime<Utc>,
}

impl LicenseBinding {
    /// Creates a binding from material the caller has already vetted.
    pub fn new(
        secret: impl Into<String>,
        fingerprint: impl Into<Vec<u8>>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            secret: secret.into(),
            fingerprint: fingerprint.into(),
            expires_at,
        }
    }

    /// Binds a license to a device.
    ///
    /// Refuses expired licenses and licenses pinned to another device.
    pub fn bind(
        license: &License,
        device: &DeviceFingerprint,
        now: DateTime<Utc>,
    ) -> LicenseResult<Self> {
        license.ensure_valid_at(now)?;
        if let Some(pinned) = license.device_id() {
            if pinned != device.id() {
                warn!("license pinned to a different device");
                return Err(LicenseError::DeviceMismatch);
            }
        }
        Ok(Self::new(license.key(), device.as_bytes(), license.expires_at()))
    }

    /// Returns the license secret.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Returns the device fingerprint bytes.
    pub fn fingerprint(&self) -> &[u8] {
        &self.fingerprint
    }

    /// Returns when the underlying license expires.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Fails with [`LicenseError::Expired`] once the license has lapsed.
    pub fn ensure_valid_at(&self, now: DateTime<Utc>) -> LicenseResult<()> {
        if now > self.expires_at {
            return Err(LicenseError::Expired(
                self.expires_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for LicenseBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseBinding")
            .field("secret", &"[REDACTED]")
            .field("fingerprint", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
