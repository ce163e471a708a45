//! Device fingerprinting for license binding.
//!
//! Generates a stable identifier for this machine. The fingerprint's bytes
//! are mixed into every asset key, so a sealed asset copied to another
//! machine cannot be opened there.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::env;

/// A stable fingerprint that identifies a device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceFingerprint {
    /// Lowercase hex of the first 16 bytes of the hardware-id hash, or an
    /// externally supplied id.
    id: String,
}

impl DeviceFingerprint {
    /// Generates a fingerprint for the current device.
    ///
    /// This combines multiple hardware identifiers to create a stable ID
    /// that survives reboots but changes if hardware changes significantly.
    #[must_use]
    pub fn generate() -> Self {
        let combined = collect_hardware_ids().join("|");
        let hash = Sha256::digest(combined.as_bytes());

        Self {
            id: hex::encode(&hash[..16]),
        }
    }

    /// Wraps an id obtained elsewhere (e.g. from an activation record).
    #[must_use]
    pub fn from_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Returns the fingerprint ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the bytes fed to key derivation.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.id.as_bytes()
    }

    /// Validates that this fingerprint matches the current device.
    #[must_use]
    pub fn matches_current(&self) -> bool {
        self.id == Self::generate().id
    }
}

/// Collects hardware identifiers for fingerprinting.
fn collect_hardware_ids() -> Vec<String> {
    let mut ids = vec![env::consts::OS.to_string(), env::consts::ARCH.to_string()];

    // Hostname (can change but usually stable)
    ids.push(get_hostname());

    // Machine ID (platform-specific, very stable)
    if let Some(machine_id) = get_machine_id() {
        ids.push(machine_id);
    }

    if let Ok(user) = env::var("USER").or_else(|_| env::var("USERNAME")) {
        ids.push(user);
    }

    ids
}

fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

fn get_machine_id() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/etc/machine-id")
            .or_else(|_| std::fs::read_to_string("/var/lib/dbus/machine-id"))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .and_then(|output| {
                output
                    .lines()
                    .find(|l| l.contains("IOPlatformUUID"))
                    .and_then(|l| l.split('"').nth(3))
                    .map(String::from)
            })
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        None
    }
}
