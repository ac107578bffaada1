//! Min-max normalisation of chart series.
//!
//! Scaling is computed over the values passed in, so the same state normalises differently in the
//! whole-dataset view and in its own single-state view.

use crate::error::PipelineError;
use crate::models::SeriesPoint;

/// Column label used when reporting a degenerate increment range.
pub const INCREMENT: &str = "incremento";
/// Column label used when reporting a degenerate precipitation range.
pub const PRECIPITATION: &str = "precipitacao_total";

/// Policy for a column whose minimum equals its maximum
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DegenerateRange {
    /// Map every value to 0.0
    #[default]
    Zero,
    /// Fail with [PipelineError::DegenerateRange]
    Reject,
}

/// Rescale values to [0, 1] using their own minimum and maximum.
///
/// # Arguments
///
/// * `values`: Values to rescale
/// * `column`: Column label reported on error
/// * `policy`: What to do when every value is equal
pub fn min_max_scale(
    values: &[f64],
    column: &'static str,
    policy: DegenerateRange,
) -> Result<Vec<f64>, PipelineError> {
    let Some(first) = values.first() else {
        return Ok(vec![]);
    };
    let (min, max) = values
        .iter()
        .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)));
    let range = max - min;
    if range == 0.0 {
        return match policy {
            DegenerateRange::Zero => Ok(vec![0.0; values.len()]),
            DegenerateRange::Reject => Err(PipelineError::DegenerateRange { column, value: min }),
        };
    }
    Ok(values.iter().map(|v| (v - min) / range).collect())
}

/// Rescale increment and precipitation of a slice independently.
pub fn normalize(
    points: &[SeriesPoint],
    policy: DegenerateRange,
) -> Result<Vec<SeriesPoint>, PipelineError> {
    let increment: Vec<f64> = points.iter().map(|p| p.increment).collect();
    let precipitation: Vec<f64> = points.iter().map(|p| p.total_precipitation).collect();
    let increment = min_max_scale(&increment, INCREMENT, policy)?;
    let precipitation = min_max_scale(&precipitation, PRECIPITATION, policy)?;
    Ok(points
        .iter()
        .zip(increment.into_iter().zip(precipitation))
        .map(|(point, (increment, total_precipitation))| SeriesPoint {
            year: point.year,
            increment,
            total_precipitation,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(year: i32, increment: f64, total_precipitation: f64) -> SeriesPoint {
        SeriesPoint {
            year,
            increment,
            total_precipitation,
        }
    }

    #[test]
    fn scale_spans_unit_interval() {
        let values = vec![250.0, 100.0, 175.0, 400.0];
        let scaled = min_max_scale(&values, INCREMENT, DegenerateRange::Reject).unwrap();
        assert_eq!(scaled, vec![0.5, 0.0, 0.25, 1.0]);
        let min = scaled.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = scaled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!((min, max), (0.0, 1.0));
    }

    #[test]
    fn scale_negative_values() {
        let scaled = min_max_scale(&[-2.0, 2.0, 0.0], INCREMENT, DegenerateRange::Zero).unwrap();
        assert_eq!(scaled, vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn scale_empty() {
        let scaled = min_max_scale(&[], INCREMENT, DegenerateRange::Reject).unwrap();
        assert!(scaled.is_empty());
    }

    #[test]
    fn scale_degenerate_zero() {
        let scaled = min_max_scale(&[7.5], PRECIPITATION, DegenerateRange::Zero).unwrap();
        assert_eq!(scaled, vec![0.0]);
        let scaled = min_max_scale(&[3.0, 3.0, 3.0], PRECIPITATION, DegenerateRange::Zero).unwrap();
        assert_eq!(scaled, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn scale_degenerate_reject() {
        let error = min_max_scale(&[7.5], PRECIPITATION, DegenerateRange::Reject).unwrap_err();
        assert!(matches!(
            error,
            PipelineError::DegenerateRange {
                column: PRECIPITATION,
                value
            } if value == 7.5
        ));
    }

    #[test]
    fn normalize_columns_independently() {
        let points = vec![
            point(2010, 100.0, 2000.0),
            point(2011, 300.0, 1000.0),
            point(2012, 200.0, 1500.0),
        ];
        let normalized = normalize(&points, DegenerateRange::Reject).unwrap();
        assert_eq!(
            normalized,
            vec![
                point(2010, 0.0, 1.0),
                point(2011, 1.0, 0.0),
                point(2012, 0.5, 0.5),
            ]
        );
    }

    #[test]
    fn normalize_is_idempotent_on_unit_range() {
        // The first pass leaves each column spanning exactly [0, 1].
        let points = vec![point(2010, 2.0, 10.0), point(2011, 4.0, 30.0), point(2012, 3.0, 20.0)];
        let once = normalize(&points, DegenerateRange::Reject).unwrap();
        let twice = normalize(&once, DegenerateRange::Reject).unwrap();
        assert_eq!(once, twice);
        assert_ne!(points, once);
    }

    #[test]
    fn normalize_single_point() {
        let points = vec![point(2015, 42.0, 1800.0)];
        let normalized = normalize(&points, DegenerateRange::Zero).unwrap();
        assert_eq!(normalized, vec![point(2015, 0.0, 0.0)]);
        let error = normalize(&points, DegenerateRange::Reject).unwrap_err();
        assert!(matches!(
            error,
            PipelineError::DegenerateRange {
                column: INCREMENT,
                ..
            }
        ));
    }

    #[test]
    fn normalize_empty() {
        assert!(normalize(&[], DegenerateRange::Reject).unwrap().is_empty());
    }
}
