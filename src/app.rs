//! Chart server API

use crate::app_state::{AppState, SharedAppState};
use crate::chart::ChartDocument;
use crate::error::PipelineError;
use crate::metrics::{self, metrics_handler, record_response_metrics, request_counter};
use crate::states;
use crate::view::View;
use crate::views;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use tower::Layer;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

impl IntoResponse for ChartDocument {
    /// Serialise the chart as a JSON response body.
    fn into_response(self) -> Response {
        match self.to_json() {
            Ok(body) => (
                [(&header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())],
                body,
            )
                .into_response(),
            Err(err) => err.into_response(),
        }
    }
}

/// Returns a [axum::Router] for the chart API
///
/// The router is populated with a route for each chart view and wrapped in tracing, metrics and
/// CORS middleware.
///
/// # Arguments
///
/// * `state`: Shared application state holding the base tables
fn router(state: SharedAppState) -> Router {
    Router::new()
        .route("/", get(view_handler::<views::Correlation>))
        .route(
            "/desmatamentoTotal",
            get(view_handler::<views::DeforestationByState>),
        )
        .route(
            "/desmatamentoAnoTotal",
            get(view_handler::<views::DeforestationByYear>),
        )
        .route(
            "/mediaPrecipitacaoAno",
            get(view_handler::<views::MeanPrecipitationByYear>),
        )
        .route(
            "/precipitacaoTotalAno",
            get(view_handler::<views::TotalPrecipitationByYear>),
        )
        .route("/metrics", get(metrics_handler))
        .route("/:state", get(state_handler))
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .on_request(request_counter)
                        .on_response(record_response_metrics),
                )
                .layer(CorsLayer::permissive()),
        )
}

/// The chart API service type
///
/// Trailing slashes are trimmed from request paths before routing.
pub type Service = NormalizePath<Router>;

/// Returns a [crate::app::Service] for the chart API over the given state.
pub fn service(state: AppState) -> Service {
    let router = router(Arc::new(state));
    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Handler for route-level chart views
///
/// Returns a `Result` with [ChartDocument] on success and [PipelineError] on failure.
///
/// # Arguments
///
/// * `state`: Shared application state
async fn view_handler<T: View>(
    State(state): State<SharedAppState>,
) -> Result<ChartDocument, PipelineError> {
    let result = T::render(&state.dataset, state.degenerate_range);
    metrics::record_render(short_type_name::<T>(), result.is_ok());
    result
}

/// Handler for single-state correlation charts
///
/// # Arguments
///
/// * `state`: Shared application state
/// * `slug`: Lowercase state identifier taken from the path
async fn state_handler(
    State(state): State<SharedAppState>,
    Path(slug): Path<String>,
) -> Result<ChartDocument, PipelineError> {
    let selected = states::State::from_slug(&slug)?;
    let result = views::correlation(&state.dataset, Some(selected), state.degenerate_range);
    metrics::record_render(selected.slug(), result.is_ok());
    result
}

/// Fallback for paths that name no chart.
async fn not_found(uri: Uri) -> PipelineError {
    PipelineError::NotFound {
        path: uri.path().to_string(),
    }
}

/// Last path segment of a type name, used as a metric label.
fn short_type_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}
