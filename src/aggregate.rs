//! Grouping and reduction of records.
//!
//! Every aggregation emits one value per distinct key in ascending key order. A key with no
//! contributing rows never appears in the output.

use crate::error::PipelineError;
use crate::models::{
    AggregatedDeforestation, AggregatedWeather, DeforestationRecord, Key, Keyed, WeatherRecord,
};

use std::collections::{BTreeMap, BTreeSet};

use strum_macros::Display;
use tracing::debug;

/// Reduction applied to the values of a group.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Reducer {
    Sum,
    Mean,
}

/// Running state of a group.
#[derive(Clone, Copy, Debug, Default)]
struct Accumulator {
    total: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    fn finish(self, reducer: Reducer) -> f64 {
        match reducer {
            Reducer::Sum => self.total,
            // Groups only exist once a value has been pushed, so count > 0.
            Reducer::Mean => self.total / self.count as f64,
        }
    }
}

/// Group rows by a typed key and reduce one value per group.
///
/// Values are accumulated in input order.
///
/// # Arguments
///
/// * `rows`: Rows to group
/// * `key`: Extracts the grouping key of a row
/// * `value`: Extracts the value to reduce
/// * `reducer`: Reduction to apply within each group
pub fn aggregate<T, K, KF, VF>(rows: &[T], key: KF, value: VF, reducer: Reducer) -> Vec<(K, f64)>
where
    K: Ord,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> f64,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(value(row));
    }
    groups
        .into_iter()
        .map(|(key, accumulator)| (key, accumulator.finish(reducer)))
        .collect()
}

/// Total deforestation increment per (year, state).
pub fn aggregate_deforestation(records: &[DeforestationRecord]) -> Vec<AggregatedDeforestation> {
    let rows: Vec<AggregatedDeforestation> =
        aggregate(records, Keyed::key, |r| r.increment, Reducer::Sum)
            .into_iter()
            .map(|(key, increment)| AggregatedDeforestation {
                year: key.year,
                state: key.state,
                increment,
            })
            .collect();
    debug!(input = records.len(), output = rows.len(), reducer = %Reducer::Sum, "aggregated deforestation");
    rows
}

/// Mean precipitation per (year, state).
pub fn aggregate_weather(records: &[WeatherRecord]) -> Vec<AggregatedWeather> {
    let rows: Vec<AggregatedWeather> = aggregate(
        records,
        Keyed::key,
        |r| r.total_precipitation,
        Reducer::Mean,
    )
    .into_iter()
    .map(|(key, total_precipitation)| AggregatedWeather {
        year: key.year,
        state: key.state,
        total_precipitation,
    })
    .collect();
    debug!(input = records.len(), output = rows.len(), reducer = %Reducer::Mean, "aggregated weather");
    rows
}

/// Mapping from alternative spellings of a state name to its canonical name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateAliases(BTreeMap<String, String>);

impl StateAliases {
    pub fn new<I, A, C>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<String>,
    {
        StateAliases(
            aliases
                .into_iter()
                .map(|(alias, canonical)| (alias.into(), canonical.into()))
                .collect(),
        )
    }

    /// Returns the canonical name for an alias, if it is one.
    pub fn canonical(&self, state: &str) -> Option<&str> {
        self.0.get(state).map(String::as_str)
    }
}

impl Default for StateAliases {
    /// The meteorological dataset spells Mato Grosso with a hyphen.
    fn default() -> Self {
        StateAliases::new([("Mato-Grosso", "Mato Grosso")])
    }
}

/// Rename aliased state labels of the aggregated weather table.
///
/// Fails with [PipelineError::Conflict] rather than merging when a renamed row lands on a
/// (year, state) key that is already present. The result is sorted by key.
pub fn canonicalize_states(
    rows: Vec<AggregatedWeather>,
    aliases: &StateAliases,
) -> Result<Vec<AggregatedWeather>, PipelineError> {
    let mut seen: BTreeSet<Key> = rows
        .iter()
        .filter(|row| aliases.canonical(&row.state).is_none())
        .map(Keyed::key)
        .collect();
    let mut canonical = Vec::with_capacity(rows.len());
    let mut renamed = 0_usize;
    for mut row in rows {
        if let Some(name) = aliases.canonical(&row.state) {
            if !seen.insert(Key::new(row.year, name)) {
                return Err(PipelineError::Conflict {
                    from: row.state,
                    to: name.to_string(),
                    year: row.year,
                });
            }
            row.state = name.to_string();
            renamed += 1;
        }
        canonical.push(row);
    }
    canonical.sort_by(|a, b| a.key().cmp(&b.key()));
    debug!(renamed, "canonicalised state labels");
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{deforestation, weather};

    use std::collections::HashMap;

    // Reference implementation: unordered grouping with a naive reduction.
    fn reference(rows: &[(i32, &str, f64)], reducer: Reducer) -> HashMap<(i32, String), f64> {
        let mut groups: HashMap<(i32, String), Vec<f64>> = HashMap::new();
        for (year, state, value) in rows {
            groups
                .entry((*year, state.to_string()))
                .or_default()
                .push(*value);
        }
        groups
            .into_iter()
            .map(|(key, values)| {
                let sum: f64 = values.iter().sum();
                let reduced = match reducer {
                    Reducer::Sum => sum,
                    Reducer::Mean => sum / values.len() as f64,
                };
                (key, reduced)
            })
            .collect()
    }

    fn sample() -> Vec<(i32, &'static str, f64)> {
        vec![
            (2011, "Para", 4.0),
            (2010, "Acre", 1.0),
            (2010, "Para", 2.0),
            (2011, "Para", 8.0),
            (2010, "Acre", 3.0),
            (2012, "Amazonas", 0.5),
            (2011, "Para", 3.0),
        ]
    }

    #[test]
    fn aggregate_matches_reference() {
        let rows = sample();
        for reducer in [Reducer::Sum, Reducer::Mean] {
            let result = aggregate(&rows, |r| (r.0, r.1.to_string()), |r| r.2, reducer);
            let expected = reference(&rows, reducer);
            // Exactly one row per distinct key.
            assert_eq!(result.len(), expected.len());
            for (key, value) in &result {
                assert_eq!(expected[key], *value, "{reducer} {key:?}");
            }
        }
    }

    #[test]
    fn aggregate_orders_by_key() {
        let result = aggregate(&sample(), |r| (r.0, r.1), |r| r.2, Reducer::Sum);
        let keys: Vec<(i32, &str)> = result.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec![
                (2010, "Acre"),
                (2010, "Para"),
                (2011, "Para"),
                (2012, "Amazonas")
            ]
        );
    }

    #[test]
    fn aggregate_empty() {
        let rows: Vec<(i32, &str, f64)> = vec![];
        assert!(aggregate(&rows, |r| r.0, |r| r.2, Reducer::Mean).is_empty());
    }

    #[test]
    fn aggregate_by_single_key() {
        let result = aggregate(&sample(), |r| r.1, |r| r.2, Reducer::Sum);
        assert_eq!(result, vec![("Acre", 4.0), ("Amazonas", 0.5), ("Para", 17.0)]);
    }

    #[test]
    fn aggregate_deforestation_sums() {
        let records = vec![
            deforestation(2010, "Acre", 100.0),
            deforestation(2010, "Acre", 20.0),
            deforestation(2010, "Para", 7.0),
        ];
        let rows = aggregate_deforestation(&records);
        assert_eq!(
            rows,
            vec![
                AggregatedDeforestation {
                    year: 2010,
                    state: "Acre".to_string(),
                    increment: 120.0,
                },
                AggregatedDeforestation {
                    year: 2010,
                    state: "Para".to_string(),
                    increment: 7.0,
                },
            ]
        );
    }

    #[test]
    fn aggregate_weather_averages() {
        let records = vec![weather(2010, "Acre", 50.0), weather(2010, "Acre", 70.0)];
        let rows = aggregate_weather(&records);
        assert_eq!(
            rows,
            vec![AggregatedWeather {
                year: 2010,
                state: "Acre".to_string(),
                total_precipitation: 60.0,
            }]
        );
    }

    #[test]
    fn canonicalize_renames_alias() {
        let rows = aggregate_weather(&[weather(2012, "Mato-Grosso", 80.0)]);
        let rows = canonicalize_states(rows, &StateAliases::default()).unwrap();
        assert_eq!(
            rows,
            vec![AggregatedWeather {
                year: 2012,
                state: "Mato Grosso".to_string(),
                total_precipitation: 80.0,
            }]
        );
    }

    #[test]
    fn canonicalize_resorts() {
        // A hyphen sorts after a space, so the alias sorts after "Mato Grosso do Sul" while the
        // canonical name sorts before it.
        let rows = aggregate_weather(&[
            weather(2012, "Mato-Grosso", 80.0),
            weather(2012, "Mato Grosso do Sul", 10.0),
            weather(2012, "Acre", 1.0),
        ]);
        let rows = canonicalize_states(rows, &StateAliases::default()).unwrap();
        let states: Vec<&str> = rows.iter().map(|r| r.state.as_str()).collect();
        assert_eq!(states, vec!["Acre", "Mato Grosso", "Mato Grosso do Sul"]);
    }

    #[test]
    fn canonicalize_conflict() {
        let rows = aggregate_weather(&[
            weather(2012, "Mato-Grosso", 80.0),
            weather(2012, "Mato Grosso", 90.0),
        ]);
        let error = canonicalize_states(rows, &StateAliases::default()).unwrap_err();
        match error {
            PipelineError::Conflict { from, to, year } => {
                assert_eq!(from, "Mato-Grosso");
                assert_eq!(to, "Mato Grosso");
                assert_eq!(year, 2012);
            }
            _ => panic!("unexpected error {error:?}"),
        }
    }

    #[test]
    fn canonicalize_different_years_do_not_conflict() {
        let rows = aggregate_weather(&[
            weather(2012, "Mato-Grosso", 80.0),
            weather(2013, "Mato Grosso", 90.0),
        ]);
        let rows = canonicalize_states(rows, &StateAliases::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.state == "Mato Grosso"));
    }

    #[test]
    fn canonicalize_two_aliases_conflict() {
        let aliases = StateAliases::new([("Mato-Grosso", "Mato Grosso"), ("MT", "Mato Grosso")]);
        let rows = aggregate_weather(&[
            weather(2012, "Mato-Grosso", 80.0),
            weather(2012, "MT", 90.0),
        ]);
        assert!(matches!(
            canonicalize_states(rows, &aliases),
            Err(PipelineError::Conflict { .. })
        ));
    }
}
