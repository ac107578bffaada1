//! Chart documents
//!
//! Charts are described as Plotly figures: a list of traces plus a layout. The document is built
//! from plain structs so that the serialised field order, and therefore the output bytes, depend
//! only on the input data and labels.

use crate::error::PipelineError;
use crate::models::SeriesPoint;

use serde::Serialize;

/// Colour of the deforestation series in correlation charts.
pub const INCREMENT_COLOUR: &str = "green";
/// Colour of the precipitation series in correlation charts.
pub const PRECIPITATION_COLOUR: &str = "blue";

/// Plotly's default qualitative palette, used for one-trace-per-category charts.
pub const PALETTE: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// A serialisable chart description.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartDocument {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl ChartDocument {
    /// Serialise the document as compact JSON.
    pub fn to_json(&self) -> Result<String, PipelineError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Kind of trace
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Scatter,
    Bar,
}

/// Values along the x axis
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Values {
    Years(Vec<i32>),
    Labels(Vec<String>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Years(years) => years.len(),
            Values::Labels(labels) => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    pub name: String,
    pub x: Values,
    pub y: Vec<f64>,
    /// Axis the trace is plotted against; Plotly defaults to `y`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Line {
    pub color: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub color: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: &str) -> Self {
        Title {
            text: text.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
}

impl Axis {
    fn titled(text: &str) -> Self {
        Axis {
            title: Title::new(text),
            overlaying: None,
            side: None,
        }
    }
}

/// How bars sharing an x value are laid out
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    /// Stacked, negative values below the axis
    Relative,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis2: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<BarMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

/// Build a dual-axis line chart comparing deforestation increment and precipitation per year.
///
/// Series 1 (increment) is drawn against the primary y axis and series 2 (precipitation) against
/// a secondary y axis on the right.
///
/// # Arguments
///
/// * `points`: Tidy table with one row per year, usually normalised
/// * `title`: Chart title
/// * `x_axis`: Title of the shared x axis
/// * `series1`: Name of the increment series and title of the primary y axis
/// * `series2`: Name of the precipitation series and title of the secondary y axis
pub fn correlation_chart(
    points: &[SeriesPoint],
    title: &str,
    x_axis: &str,
    series1: &str,
    series2: &str,
) -> ChartDocument {
    let years: Vec<i32> = points.iter().map(|p| p.year).collect();
    let line = |name: &str, y: Vec<f64>, yaxis: &'static str, color: &'static str| Trace {
        kind: TraceKind::Scatter,
        mode: Some("lines"),
        name: name.to_string(),
        x: Values::Years(years.clone()),
        y,
        yaxis: Some(yaxis),
        line: Some(Line { color }),
        marker: None,
    };
    ChartDocument {
        data: vec![
            line(
                series1,
                points.iter().map(|p| p.increment).collect(),
                "y",
                INCREMENT_COLOUR,
            ),
            line(
                series2,
                points.iter().map(|p| p.total_precipitation).collect(),
                "y2",
                PRECIPITATION_COLOUR,
            ),
        ],
        layout: Layout {
            title: Title::new(title),
            xaxis: Axis::titled(x_axis),
            yaxis: Axis::titled(series1),
            yaxis2: Some(Axis {
                title: Title::new(series2),
                overlaying: Some("y"),
                side: Some("right"),
            }),
            barmode: None,
            legend: None,
        },
    }
}

/// A named series of a categorical chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: String,
    pub x: Values,
    pub y: Vec<f64>,
}

/// Labels of a categorical chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Labels<'a> {
    pub title: &'a str,
    pub x_axis: &'a str,
    pub y_axis: &'a str,
    /// Legend title, shown when there is one trace per category
    pub legend: Option<&'a str>,
}

/// Build a bar chart with one trace per series. Multiple traces are stacked.
pub fn bar_chart(series: Vec<Series>, labels: &Labels<'_>) -> ChartDocument {
    let barmode = (series.len() > 1).then_some(BarMode::Relative);
    categorical(series, labels, TraceKind::Bar, barmode)
}

/// Build a line chart with one trace per series.
pub fn line_chart(series: Vec<Series>, labels: &Labels<'_>) -> ChartDocument {
    categorical(series, labels, TraceKind::Scatter, None)
}

fn categorical(
    series: Vec<Series>,
    labels: &Labels<'_>,
    kind: TraceKind,
    barmode: Option<BarMode>,
) -> ChartDocument {
    let data = series
        .into_iter()
        .enumerate()
        .map(|(i, series)| {
            let color = PALETTE[i % PALETTE.len()];
            let (mode, line, marker) = match kind {
                TraceKind::Scatter => (Some("lines"), Some(Line { color }), None),
                TraceKind::Bar => (None, None, Some(Marker { color })),
            };
            Trace {
                kind,
                mode,
                name: series.name,
                x: series.x,
                y: series.y,
                yaxis: None,
                line,
                marker,
            }
        })
        .collect();
    ChartDocument {
        data,
        layout: Layout {
            title: Title::new(labels.title),
            xaxis: Axis::titled(labels.x_axis),
            yaxis: Axis::titled(labels.y_axis),
            yaxis2: None,
            barmode,
            legend: labels.legend.map(|text| Legend {
                title: Title::new(text),
            }),
        },
    }
}
