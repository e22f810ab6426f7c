//! Subscriber setup for the harness binary.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives, e.g.
/// `SETLIST_LOG=setlist_core=debug`.
pub const LOG_ENV: &str = "SETLIST_LOG";

const DEFAULT_DIRECTIVES: &str = "warn";

/// Install a stderr `fmt` subscriber. Safe to call more than once.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
