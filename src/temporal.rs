//! Year extraction and temporal filtering.

use crate::error::PipelineError;
use crate::models::{Keyed, RawWeatherRecord, WeatherRecord};

/// First year kept by default.
pub const DEFAULT_MIN_YEAR: i32 = 2010;

/// Parse the leading 4-digit year of a date such as `2010-01-31`.
pub fn parse_year(date: &str) -> Result<i32, PipelineError> {
    let format_error = || PipelineError::Format {
        value: date.to_string(),
    };
    let year = date.get(..4).ok_or_else(format_error)?;
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format_error());
    }
    year.parse::<i32>().map_err(|_| format_error())
}

/// Reduce the date of a meteorological record to its year.
pub fn normalize_year(record: RawWeatherRecord) -> Result<WeatherRecord, PipelineError> {
    Ok(WeatherRecord {
        year: parse_year(&record.date)?,
        state: record.state,
        total_precipitation: record.total_precipitation,
    })
}

/// Keep the rows dated `min_year` or later, sorted ascending by (year, state).
///
/// The sort is stable, so rows sharing a key keep their source order.
pub fn filter_by_year<T: Keyed>(rows: Vec<T>, min_year: i32) -> Vec<T> {
    let mut kept: Vec<T> = rows.into_iter().filter(|row| row.year() >= min_year).collect();
    kept.sort_by(|a, b| {
        a.year()
            .cmp(&b.year())
            .then_with(|| a.state().cmp(b.state()))
    });
    kept
}
