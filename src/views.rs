//! Chart views.
//!
//! Each route-level view is implemented as a struct that implements the
//! [View](crate::view::View) trait. Single-state correlation charts are rendered by
//! [correlation], which the dispatcher calls with the state parsed from the path.

use std::collections::BTreeMap;

use crate::aggregate::{aggregate, Reducer};
use crate::chart::{self, ChartDocument, Labels, Series, Values};
use crate::dataset::Dataset;
use crate::error::PipelineError;
use crate::models::{Keyed, SeriesPoint};
use crate::normalize::{normalize, DegenerateRange};
use crate::states::State;
use crate::view::View;

use tracing::debug;

/// Title of the year axis of correlation charts.
pub const X_AXIS: &str = "Ano";
/// Name of the deforestation series of correlation charts.
pub const INCREMENT_SERIES: &str = "Desmatamento (Área em km²)";
/// Name of the precipitation series of correlation charts.
pub const PRECIPITATION_SERIES: &str = "Precipitação (mm)";

const CORRELATION_TITLE: &str = "Correlação entre Desmatamento e Precipitação";

/// Render a normalised correlation chart.
///
/// Without a state, increment and precipitation of every joined row are summed per year. With a
/// state, the joined rows of that state are used as they are. Either way the slice is normalised
/// on its own minimum and maximum; a state without joined rows yields a chart with empty series.
///
/// # Arguments
///
/// * `dataset`: Shared base tables
/// * `state`: Optional state filter
/// * `policy`: Handling of zero-width ranges
pub fn correlation(
    dataset: &Dataset,
    state: Option<State>,
    policy: DegenerateRange,
) -> Result<ChartDocument, PipelineError> {
    let (points, title) = match state {
        None => {
            let rows = &dataset.correlation;
            let increment = aggregate(rows, |r| r.year, |r| r.increment, Reducer::Sum);
            let precipitation =
                aggregate(rows, |r| r.year, |r| r.total_precipitation, Reducer::Sum);
            // Same rows and key, so both aggregates share their keys and order.
            let points: Vec<SeriesPoint> = increment
                .into_iter()
                .zip(precipitation)
                .map(|((year, increment), (_, total_precipitation))| SeriesPoint {
                    year,
                    increment,
                    total_precipitation,
                })
                .collect();
            (points, format!("{CORRELATION_TITLE} Geral"))
        }
        Some(state) => {
            let name = state.to_string();
            let points: Vec<SeriesPoint> = dataset
                .correlation
                .iter()
                .filter(|row| row.state == name)
                .map(SeriesPoint::from)
                .collect();
            (
                points,
                format!("{CORRELATION_TITLE} no Estado {}", state.title()),
            )
        }
    };
    debug!(?state, points = points.len(), "correlation slice");
    let normalized = normalize(&points, policy)?;
    Ok(chart::correlation_chart(
        &normalized,
        &title,
        X_AXIS,
        INCREMENT_SERIES,
        PRECIPITATION_SERIES,
    ))
}

/// One series per state, holding the year and value of each of the state's rows.
///
/// Rows are expected in (year, state) order, so each series is in year order.
fn series_by_state<T: Keyed>(rows: &[T], value: impl Fn(&T) -> f64) -> Vec<Series> {
    let mut states: BTreeMap<&str, (Vec<i32>, Vec<f64>)> = BTreeMap::new();
    for row in rows {
        let (years, values) = states.entry(row.state()).or_default();
        years.push(row.year());
        values.push(value(row));
    }
    states
        .into_iter()
        .map(|(state, (years, y))| Series {
            name: state.to_string(),
            x: Values::Years(years),
            y,
        })
        .collect()
}

/// Correlation between deforestation and precipitation over all states.
pub struct Correlation {}

impl View for Correlation {
    fn render(dataset: &Dataset, policy: DegenerateRange) -> Result<ChartDocument, PipelineError> {
        correlation(dataset, None, policy)
    }
}

/// Total deforestation increment per state, one bar per state.
pub struct DeforestationByState {}

impl View for DeforestationByState {
    fn render(dataset: &Dataset, _policy: DegenerateRange) -> Result<ChartDocument, PipelineError> {
        let totals = aggregate(
            &dataset.deforestation,
            |r| r.state.clone(),
            |r| r.increment,
            Reducer::Sum,
        );
        let series = totals
            .into_iter()
            .map(|(state, total)| Series {
                name: state.clone(),
                x: Values::Labels(vec![state]),
                y: vec![total],
            })
            .collect();
        let labels = Labels {
            title: "Área Amazônica já Desmatada por Estado (km²)",
            x_axis: "Estados",
            y_axis: "incremento",
            legend: Some("Estados"),
        };
        Ok(chart::bar_chart(series, &labels))
    }
}

/// Deforestation increment per year, stacked by state.
pub struct DeforestationByYear {}

impl View for DeforestationByYear {
    fn render(dataset: &Dataset, _policy: DegenerateRange) -> Result<ChartDocument, PipelineError> {
        let series = series_by_state(&dataset.deforestation, |r| r.increment);
        let labels = Labels {
            title: "Área Amazônica Geral Desmatada por Ano (km²)",
            x_axis: "Anos",
            y_axis: "incremento",
            legend: Some("Estados"),
        };
        Ok(chart::bar_chart(series, &labels))
    }
}

/// Mean precipitation per year, one line per state.
pub struct MeanPrecipitationByYear {}

impl View for MeanPrecipitationByYear {
    fn render(dataset: &Dataset, _policy: DegenerateRange) -> Result<ChartDocument, PipelineError> {
        let series = series_by_state(&dataset.weather, |r| r.total_precipitation);
        let labels = Labels {
            title: "Média de chuvas por ano",
            x_axis: "Anos",
            y_axis: "Precipitação média (mm)",
            legend: Some("Estados"),
        };
        Ok(chart::line_chart(series, &labels))
    }
}

/// Precipitation summed over all states per year.
pub struct TotalPrecipitationByYear {}

impl View for TotalPrecipitationByYear {
    fn render(dataset: &Dataset, _policy: DegenerateRange) -> Result<ChartDocument, PipelineError> {
        let totals = aggregate(
            &dataset.weather,
            |r| r.year,
            |r| r.total_precipitation,
            Reducer::Sum,
        );
        let (years, y) = totals.into_iter().unzip();
        let y_axis = "Precipitação total (mm)";
        let series = vec![Series {
            name: y_axis.to_string(),
            x: Values::Years(years),
            y,
        }];
        let labels = Labels {
            title: "Quantidade de chuva por ano",
            x_axis: "Anos",
            y_axis,
            legend: None,
        };
        Ok(chart::bar_chart(series, &labels))
    }
}
