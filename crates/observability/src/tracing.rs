//! Tracing subscriber initialization.

use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber: JSON logs, `RUST_LOG`-configurable
/// filtering, `info` by default.
///
/// Repeated calls are no-ops (the first subscriber wins).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
