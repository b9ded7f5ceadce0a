//! Logging bootstrap
//!
//! The library only emits `tracing` events; binaries call [`init`] once
//! to install a subscriber. `RUST_LOG` takes precedence over the
//! configured level.

use crate::config::EngineConfig;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// Returns false if logging is disabled or a subscriber is already set.
pub fn init(config: &EngineConfig) -> bool {
    if !config.enable_log {
        return false;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
