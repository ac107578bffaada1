//! Tracing (logging)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "amazonia=debug,tower_http=debug";

/// Build the log filter from `RUST_LOG`, falling back to [DEFAULT_FILTER].
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Initialise tracing (logging)
///
/// Pipeline stages log row counts, skipped rows are logged as warnings and server errors are
/// logged together with their cause chain.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
