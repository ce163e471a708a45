//! Logging setup.

use crate::AppConfig;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs a compact `tracing` subscriber filtered by `config.log_filter`.
///
/// `RUST_LOG` wins over the configured filter when set. Returns `false` if a
/// global subscriber was already installed (e.g. by a test harness).
pub fn init_logging(config: &AppConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
