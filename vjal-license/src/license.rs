//! License file parsing and validation.
//!
//! The license artifact is a JSON document:
//!
//! ```json
//! {
//!   "license_key": "ABC-123",
//!   "expires": "2027-01-01T00:00:00Z",
//!   "features": ["offline", "pdf"],
//!   "deviceID": "optional-pinned-device"
//! }
//! ```
//!
//! `key` is accepted as an alias of `license_key`.

use crate::binding::LicenseBinding;
use crate::device::DeviceFingerprint;
use crate::error::{LicenseError, LicenseResult};
use crate::telemetry;
use chrono::{DateTime, SecondsFormat, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use vjal_config::AppConfig;

/// A parsed license.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    #[serde(rename = "license_key", alias = "key")]
    key: String,
    expires: DateTime<Utc>,
    #[serde(default)]
    features: Vec<String>,
    #[serde(rename = "deviceID", default, skip_serializing_if = "Option::is_none")]
    device_id: Option<String>,
}

impl License {
    /// Creates a license (mainly for tests and tooling that issue licenses).
    pub fn new(key: impl Into<String>, expires: DateTime<Utc>, features: Vec<String>) -> Self {
        Self {
            key: key.into(),
            expires,
            features,
            device_id: None,
        }
    }

    /// Pins the license to a device fingerprint id.
    #[must_use]
    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Parses a license document. Expiry is not checked.
    pub fn from_json(data: &[u8]) -> LicenseResult<Self> {
        let license: Self = serde_json::from_slice(data)
            .map_err(|e| LicenseError::InvalidPayload(format!("invalid JSON in license file: {e}")))?;
        if license.key.trim().is_empty() {
            return Err(LicenseError::InvalidPayload("license key is empty".to_string()));
        }
        Ok(license)
    }

    /// Returns the license secret.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the expiration timestamp.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires
    }

    /// Returns the enabled features.
    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Returns true if `feature` is enabled.
    #[must_use]
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    /// Returns the pinned device id, if any.
    #[must_use]
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// Returns true if the license has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires
    }

    /// Fails with [`LicenseError::Expired`] if the license has expired at `now`.
    pub fn ensure_valid_at(&self, now: DateTime<Utc>) -> LicenseResult<()> {
        if self.is_expired_at(now) {
            return Err(LicenseError::Expired(
                self.expires.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for License {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("License")
            .field("key", &"[REDACTED]")
            .field("expires", &self.expires)
            .field("features", &self.features)
            .field("device_id", &self.device_id)
            .finish()
    }
}

/// Reads and checks the license file at a configured path.
#[derive(Debug, Clone)]
pub struct LicenseValidator {
    path: PathBuf,
}

impl LicenseValidator {
    /// Creates a validator for the license file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a validator for `config.license_path`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.license_path)
    }

    /// Returns the license file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads, parses and checks the license for expiry.
    pub fn validate(&self) -> LicenseResult<License> {
        self.validate_at(Utc::now())
    }

    /// Like [`LicenseValidator::validate`] with an explicit clock.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn validate_at(&self, now: DateTime<Utc>) -> LicenseResult<License> {
        counter!(telemetry::LICENSE_VALIDATION_TOTAL).increment(1);
        let license = self.read().inspect_err(|_| {
            counter!(telemetry::LICENSE_VALIDATION_ERRORS).increment(1);
        })?;
        if let Err(err) = license.ensure_valid_at(now) {
            counter!(telemetry::LICENSE_VALIDATION_ERRORS).increment(1);
            warn!(expires = %license.expires_at(), "license rejected");
            return Err(err);
        }
        info!(expires = %license.expires_at(), features = license.features().len(), "license valid");
        Ok(license)
    }

    /// Returns true if the license file lists `feature`.
    ///
    /// Re-reads the file on every call; any read or parse failure yields
    /// `false`. Expiry is not considered.
    #[must_use]
    pub fn check_feature(&self, feature: &str) -> bool {
        self.read().is_ok_and(|license| license.has_feature(feature))
    }

    /// Readiness probe: succeeds while the license is valid.
    pub fn health_check(&self) -> LicenseResult<()> {
        self.validate().map(|_| ())
    }

    /// Validates the license and binds it to `device`.
    pub fn bind(&self, device: &DeviceFingerprint) -> LicenseResult<LicenseBinding> {
        let now = Utc::now();
        let license = self.validate_at(now)?;
        LicenseBinding::bind(&license, device, now)
    }

    fn read(&self) -> LicenseResult<License> {
        let data = std::fs::read(&self.path).map_err(LicenseError::io(&self.path))?;
        License::from_json(&data)
    }
}
