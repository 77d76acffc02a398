//! Logging setup
//!
//! fanyi only emits `tracing` events (targets under `fanyi::`). Applications
//! that do not install their own subscriber can call [`init_tracing`].

use tracing_subscriber::EnvFilter;

use crate::error::{Result, TranslatorError};

/// Default directive when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "fanyi=info";

/// Install a global fmt subscriber filtered by `RUST_LOG`, or by
/// `default_filter` when `RUST_LOG` is unset or invalid.
///
/// Fails instead of panicking when a global subscriber already exists.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| TranslatorError::ConfigurationError(format!("log filter: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| TranslatorError::ConfigurationError(format!("tracing subscriber: {e}")))
}
