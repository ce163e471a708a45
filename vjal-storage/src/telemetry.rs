//! Metrics recorded by the state store.
//!
//! Counters go to whatever `metrics` recorder the application installs; with
//! none installed they are no-ops.

use metrics::{describe_counter, Unit};

/// Save calls, sync and deadline-bounded.
pub const STATE_SAVE_TOTAL: &str = "vjal_storage_state_save_total";
/// Load calls, sync and deadline-bounded.
pub const STATE_LOAD_TOTAL: &str = "vjal_storage_state_load_total";

/// Registers metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(STATE_SAVE_TOTAL, Unit::Count, "Total number of state save calls");
    describe_counter!(STATE_LOAD_TOTAL, Unit::Count, "Total number of state load calls");
}
