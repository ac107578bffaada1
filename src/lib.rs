//! This crate provides a chart server correlating deforestation in the Brazilian Legal Amazon
//! with precipitation. Two delimiter-separated tables, one with yearly deforestation per state
//! and one with meteorological readings, are loaded once at startup, aggregated per (year,
//! state) and joined. Each request derives its own slice of the joined table and returns it as
//! a [Plotly](https://plotly.com/javascript/) figure in JSON.
//!
//! The server is built on top of a number of open source components.
//!
//! * [Tokio](tokio), the most popular asynchronous Rust runtime.
//! * [Axum](axum) web framework, built by the Tokio team, on top of the [hyper] HTTP library.
//! * [csv] splits the source files into records.
//! * [Serde](serde) performs serialisation of the chart documents.
//!
//! The pipeline runs in the following order:
//!
//! 1. [schema] loads and types the source rows
//! 2. [temporal] derives years from dates and discards rows before the cut-off year
//! 3. [aggregate] groups rows per (year, state) and reconciles state spellings
//! 4. [join] pairs the two aggregates on (year, state)
//! 5. [views] select a slice, [normalize] rescales it and [chart] describes the figure

pub mod aggregate;
pub mod app;
pub mod app_state;
pub mod chart;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod join;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod schema;
pub mod server;
pub mod states;
pub mod temporal;
#[cfg(test)]
pub mod test_utils;
pub mod tracing;
pub mod view;
pub mod views;
