//! Tracing subscriber initialization.
//!
//! Diagnostics go to stderr so they never mix with command output on stdout.
//! `RUST_LOG` controls the filter (default `warn`); `--verbose` forces
//! `debug` for this crate.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("folio=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Install the global stderr subscriber.
pub fn init(verbose: bool) -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}
