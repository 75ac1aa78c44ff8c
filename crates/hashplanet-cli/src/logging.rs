//! Logging setup

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter directive for the verbosity flag
#[must_use]
pub fn filter_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Install the global subscriber. Call once per process.
pub fn setup_logging(verbose: bool, color: bool) {
    let filter = EnvFilter::new(filter_directive(verbose));

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(color))
        .with(filter)
        .init();
}
