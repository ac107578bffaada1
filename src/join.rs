//! Inner join of the aggregated tables.

use crate::models::{AggregatedDeforestation, AggregatedWeather, CorrelationRow};

use std::collections::BTreeMap;

use tracing::debug;

/// Inner-join aggregated deforestation and weather on (year, state).
///
/// A row is emitted iff both tables hold the exact key; state names are compared verbatim. The
/// result is sorted ascending by (year, state). An empty result is valid.
pub fn join(
    deforestation: &[AggregatedDeforestation],
    weather: &[AggregatedWeather],
) -> Vec<CorrelationRow> {
    let precipitation: BTreeMap<(i32, &str), f64> = weather
        .iter()
        .map(|row| ((row.year, row.state.as_str()), row.total_precipitation))
        .collect();
    let mut rows: Vec<CorrelationRow> = deforestation
        .iter()
        .filter_map(|row| {
            precipitation
                .get(&(row.year, row.state.as_str()))
                .map(|total_precipitation| CorrelationRow {
                    year: row.year,
                    state: row.state.clone(),
                    increment: row.increment,
                    total_precipitation: *total_precipitation,
                })
        })
        .collect();
    rows.sort_by(|a, b| (a.year, &a.state).cmp(&(b.year, &b.state)));
    debug!(
        deforestation = deforestation.len(),
        weather = weather.len(),
        joined = rows.len(),
        "joined"
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Key, Keyed};

    use std::collections::BTreeSet;

    fn deforestation(year: i32, state: &str, increment: f64) -> AggregatedDeforestation {
        AggregatedDeforestation {
            year,
            state: state.to_string(),
            increment,
        }
    }

    fn weather(year: i32, state: &str, total_precipitation: f64) -> AggregatedWeather {
        AggregatedWeather {
            year,
            state: state.to_string(),
            total_precipitation,
        }
    }

    #[test]
    fn join_single_match() {
        let rows = join(
            &[deforestation(2010, "Acre", 100.0)],
            &[weather(2010, "Acre", 60.0)],
        );
        assert_eq!(
            rows,
            vec![CorrelationRow {
                year: 2010,
                state: "Acre".to_string(),
                increment: 100.0,
                total_precipitation: 60.0,
            }]
        );
    }

    #[test]
    fn join_key_in_both() {
        let a = vec![
            deforestation(2010, "Acre", 1.0),
            deforestation(2010, "Para", 2.0),
            deforestation(2011, "Acre", 3.0),
            deforestation(2012, "Roraima", 4.0),
        ];
        let b = vec![
            weather(2010, "Para", 5.0),
            weather(2011, "Acre", 6.0),
            weather(2011, "Para", 7.0),
            weather(2012, "Mato-Grosso", 8.0),
        ];
        let joined = join(&a, &b);
        let keys_a: BTreeSet<Key> = a.iter().map(Keyed::key).collect();
        let keys_b: BTreeSet<Key> = b.iter().map(Keyed::key).collect();
        let keys_joined: BTreeSet<Key> = joined.iter().map(Keyed::key).collect();
        let expected: BTreeSet<Key> = keys_a.intersection(&keys_b).cloned().collect();
        assert_eq!(keys_joined, expected);
        assert!(joined.len() <= a.len().min(b.len()));
        assert_eq!(joined.len(), 2);
    }

    #[test]
    fn join_is_sorted() {
        let a = vec![
            deforestation(2011, "Acre", 3.0),
            deforestation(2010, "Para", 2.0),
            deforestation(2010, "Acre", 1.0),
        ];
        let b = vec![
            weather(2010, "Acre", 1.0),
            weather(2011, "Acre", 1.0),
            weather(2010, "Para", 1.0),
        ];
        let keys: Vec<Key> = join(&a, &b).iter().map(Keyed::key).collect();
        assert_eq!(
            keys,
            vec![
                Key::new(2010, "Acre"),
                Key::new(2010, "Para"),
                Key::new(2011, "Acre"),
            ]
        );
    }

    #[test]
    fn join_no_fuzzy_match() {
        let rows = join(
            &[deforestation(2012, "Mato Grosso", 1.0)],
            &[weather(2012, "Mato-Grosso", 1.0)],
        );
        assert!(rows.is_empty());
    }

    #[test]
    fn join_empty() {
        assert!(join(&[], &[weather(2010, "Acre", 1.0)]).is_empty());
        assert!(join(&[deforestation(2010, "Acre", 1.0)], &[]).is_empty());
    }
}
