//! Licensing and device binding for VJAL.
//!
//! This module handles:
//! - Reading and validating the JSON license file (expiry, features)
//! - Hardware fingerprinting for device binding
//! - Producing the [`LicenseBinding`] the cipher consumes
//! - Sealing and opening proprietary assets with [`AssetVault`]
//!
//! The cipher in `vjal-crypto` trusts its caller; every expiry and device
//! check happens here, before key material reaches it.

mod binding;
mod device;
mod error;
mod license;
pub mod telemetry;
mod vault;

pub use binding::LicenseBinding;
pub use device::DeviceFingerprint;
pub use error::{LicenseError, LicenseResult};
pub use license::{License, LicenseValidator};
pub use telemetry::describe_metrics;
pub use vault::AssetVault;
