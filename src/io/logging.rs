//! Structured logging setup for the command-line binary

use crate::io::error::{Result, invalid_parameter};
use tracing_subscriber::EnvFilter;

/// Build the log filter; `RUST_LOG` wins over `level` when it is set and valid
///
/// # Errors
///
/// Returns an invalid parameter error if `level` is not a valid filter directive
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| invalid_parameter("log_level", &level, &e))
}

/// Install the global subscriber, writing to stderr as text or JSON lines
///
/// Installing twice is harmless: the first subscriber stays active.
///
/// # Errors
///
/// Returns an invalid parameter error if `level` is not a valid filter directive
pub fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = build_filter(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    Ok(())
}
