//! Base tables computed once at startup.

use crate::aggregate::{self, StateAliases};
use crate::error::PipelineError;
use crate::join;
use crate::models::{
    AggregatedDeforestation, AggregatedWeather, CorrelationRow, DeforestationRecord,
    RawWeatherRecord,
};
use crate::schema::{self, LoadOptions};
use crate::temporal;

use std::path::PathBuf;

use tracing::info;

/// Where and how to read the source files.
#[derive(Clone, Debug, PartialEq)]
pub struct Sources {
    pub deforestation_file: PathBuf,
    pub weather_file: PathBuf,
    pub load_options: LoadOptions,
}

/// Options of the transformation steps between loading and joining.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOptions {
    /// Rows dated before this year are discarded
    pub min_year: i32,
    /// Canonical spellings applied to the weather aggregate before the join
    pub aliases: StateAliases,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            min_year: temporal::DEFAULT_MIN_YEAR,
            aliases: StateAliases::default(),
        }
    }
}

/// Immutable base tables shared by every request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    /// Summed increment per (year, state)
    pub deforestation: Vec<AggregatedDeforestation>,
    /// Mean precipitation per (year, state), with canonical state names
    pub weather: Vec<AggregatedWeather>,
    /// Inner join of the two aggregates
    pub correlation: Vec<CorrelationRow>,
}

impl Dataset {
    /// Load both source files and run the pipeline.
    pub fn load(sources: &Sources, options: &PipelineOptions) -> Result<Self, PipelineError> {
        let deforestation =
            schema::load::<DeforestationRecord>(&sources.deforestation_file, &sources.load_options)?;
        let weather = schema::load::<RawWeatherRecord>(&sources.weather_file, &sources.load_options)?;
        Self::build(deforestation, weather, options)
    }

    /// Run the pipeline over records already in memory.
    ///
    /// Any malformed date fails the whole build, including dates that would later be filtered
    /// out by year.
    pub fn build(
        deforestation: Vec<DeforestationRecord>,
        weather: Vec<RawWeatherRecord>,
        options: &PipelineOptions,
    ) -> Result<Self, PipelineError> {
        let weather = weather
            .into_iter()
            .map(temporal::normalize_year)
            .collect::<Result<Vec<_>, _>>()?;
        let weather = temporal::filter_by_year(weather, options.min_year);
        let deforestation = temporal::filter_by_year(deforestation, options.min_year);

        let deforestation = aggregate::aggregate_deforestation(&deforestation);
        let weather = aggregate::aggregate_weather(&weather);
        let weather = aggregate::canonicalize_states(weather, &options.aliases)?;
        let correlation = join::join(&deforestation, &weather);

        info!(
            min_year = options.min_year,
            deforestation = deforestation.len(),
            weather = weather.len(),
            correlation = correlation.len(),
            "dataset ready"
        );
        Ok(Dataset {
            deforestation,
            weather,
            correlation,
        })
    }
}
