//! Record types flowing through the correlation pipeline

/// Aggregation key: a (year, state) pair.
///
/// The derived ordering is ascending by year, then by state name, which is the ordering used for
/// every table emitted by the pipeline.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Key {
    pub year: i32,
    pub state: String,
}

impl Key {
    pub fn new(year: i32, state: impl Into<String>) -> Self {
        Key {
            year,
            state: state.into(),
        }
    }
}

/// Typed access to the (year, state) key of a row.
pub trait Keyed {
    fn year(&self) -> i32;

    fn state(&self) -> &str;

    /// Returns an owned copy of the row's key.
    fn key(&self) -> Key {
        Key::new(self.year(), self.state())
    }
}

/// One row of the annual deforestation dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct DeforestationRecord {
    pub year: i32,
    pub state: String,
    /// Area of the monitored region (km²)
    pub area: i64,
    /// Accumulated deforested area (km²)
    pub deforested_area: f64,
    /// Area deforested within the year (km²)
    pub increment: f64,
    pub forest_cover: f64,
    pub cloud_cover: f64,
}

/// One row of the meteorological dataset as it appears in the source file.
#[derive(Clone, Debug, PartialEq)]
pub struct RawWeatherRecord {
    pub date: String,
    pub state: String,
    /// Precipitation (mm)
    pub total_precipitation: f64,
}

/// A meteorological row with its date reduced to a year.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherRecord {
    pub year: i32,
    pub state: String,
    pub total_precipitation: f64,
}

/// Total deforestation increment for one (year, state).
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedDeforestation {
    pub year: i32,
    pub state: String,
    pub increment: f64,
}

/// Mean precipitation for one (year, state).
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedWeather {
    pub year: i32,
    pub state: String,
    pub total_precipitation: f64,
}

/// A (year, state) present in both aggregated tables.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationRow {
    pub year: i32,
    pub state: String,
    pub increment: f64,
    pub total_precipitation: f64,
}

/// One x-axis position of a correlation chart.
///
/// Holds either raw or normalised values depending on where it is in the pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    pub increment: f64,
    pub total_precipitation: f64,
}

impl From<&CorrelationRow> for SeriesPoint {
    fn from(row: &CorrelationRow) -> Self {
        SeriesPoint {
            year: row.year,
            increment: row.increment,
            total_precipitation: row.total_precipitation,
        }
    }
}

macro_rules! impl_keyed {
    ($($record:ty),+) => {
        $(
            impl Keyed for $record {
                fn year(&self) -> i32 {
                    self.year
                }

                fn state(&self) -> &str {
                    &self.state
                }
            }
        )+
    };
}

impl_keyed!(
    DeforestationRecord,
    WeatherRecord,
    AggregatedDeforestation,
    AggregatedWeather,
    CorrelationRow
);
