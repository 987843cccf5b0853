//! Tracing subscriber construction.
//!
//! The subscriber is built explicitly and installed by `main` as the default
//! for the run's scope; spawned workers carry it along with
//! [`WithSubscriber::with_current_subscriber`](tracing::instrument::WithSubscriber).

use tracing::Subscriber;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, defaulting to `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Build the task's log subscriber: UTC RFC 3339 timestamps, source file and
/// line of each event.
pub fn subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(UtcTime::rfc_3339())
        .finish()
}
