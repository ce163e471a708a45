//! Metrics recorded by license validation.

use metrics::{describe_counter, Unit};

/// Every call to [`crate::LicenseValidator::validate`].
pub const LICENSE_VALIDATION_TOTAL: &str = "vjal_license_validation_total";
/// Validations that failed: unreadable, malformed or expired.
pub const LICENSE_VALIDATION_ERRORS: &str = "vjal_license_validation_errors_total";

/// Registers metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(
        LICENSE_VALIDATION_TOTAL,
        Unit::Count,
        "Total license validation attempts"
    );
    describe_counter!(
        LICENSE_VALIDATION_ERRORS,
        Unit::Count,
        "Total number of license validation failures"
    );
}
