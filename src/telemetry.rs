//! Tracing subscriber setup for hosts embedding the controller.

use crate::config::LoggingConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber. `RUST_LOG` wins over the configured level.
///
/// Returns `false` when a global subscriber was already installed, which is
/// common in tests and in hosts that set up their own logging.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        info!(level = %config.level, "faculty-finder v{} logging initialized", env!("CARGO_PKG_VERSION"));
    }
    installed
}
