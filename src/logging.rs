//! Diagnostics go to stderr. Stdout carries the protocol and nothing else.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber.
///
/// Respects `RUST_LOG`; otherwise uses `default_filter` (from config).
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .try_init();
}
