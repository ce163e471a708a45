//! Metrics recorded while loading configuration.

use metrics::{describe_counter, describe_histogram, Unit};

/// Wall time of [`crate::AppConfig::load`], successful or not.
pub const CONFIG_LOAD_DURATION: &str = "vjal_config_load_duration_seconds";
/// Loads that failed to read, parse, override or validate.
pub const CONFIG_LOAD_ERRORS: &str = "vjal_config_load_errors_total";

/// Registers metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_histogram!(CONFIG_LOAD_DURATION, Unit::Seconds, "Duration of config loading");
    describe_counter!(CONFIG_LOAD_ERRORS, Unit::Count, "Number of config load errors");
}
