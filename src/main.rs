//! This file defines the amazonia binary entry point.

use amazonia::app;
use amazonia::app_state::AppState;
use amazonia::cli;
use amazonia::metrics;
use amazonia::server;
use amazonia::tracing;

use std::process::exit;

/// Application entry point
#[tokio::main]
async fn main() {
    let args = cli::parse();
    tracing::init_tracing();
    ::tracing::debug!("{:?}", args);
    metrics::register_metrics();
    // Any load error is fatal before the listener is bound.
    let state = match AppState::new(&args) {
        Ok(state) => state,
        Err(err) => {
            ::tracing::error!("failed to load datasets: {}", err);
            let mut current = std::error::Error::source(&err);
            while let Some(source) = current {
                ::tracing::error!("Caused by: {}", source);
                current = source.source();
            }
            exit(1)
        }
    };
    let service = app::service(state);
    server::serve(&args, service).await;
}
