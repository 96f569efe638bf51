//! Log subscriber installation for the harness binary.
//!
//! The library only emits `tracing` events; the binary installs a `fmt`
//! subscriber writing to stderr, filtered by `RUST_LOG` when it is set and
//! valid, and at `info` otherwise.

use tracing_subscriber::EnvFilter;

use crate::error::HarnessError;

/// Filter applied when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Builds a filter from `directives`, falling back to [`DEFAULT_FILTER`].
#[must_use]
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns [`HarnessError::Configuration`] when a global subscriber is
/// already installed.
pub fn init() -> Result<(), HarnessError> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| HarnessError::Configuration {
            message: format!("failed to install log subscriber: {error}"),
        })
}
