//! Logging setup.
//!
//! All diagnostics go to stderr so the exported CSV on stdout stays
//! machine-readable.

use crate::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// Default level is `info`, raised to `debug` with `verbose`; `RUST_LOG`
/// overrides both.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed.
pub fn init(verbose: bool) -> Result<()> {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::OperationFailed {
            operation: "logging_init".to_string(),
            cause: e.to_string(),
        })
}
