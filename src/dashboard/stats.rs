use crate::domain::model::{GOLEM, VAMPIRE};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One plotted point. `population` is `None` when the value is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationRow {
    pub time: f64,
    pub species: String,
    pub population: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation, absent with fewer than two values.
    pub std: Option<f64>,
}

fn field(record: &Value, key: &str, species: &str) -> f64 {
    record
        .get(key)
        .and_then(Value::as_f64)
        .or_else(|| {
            record
                .get("populations")
                .and_then(|p| p.get(species))
                .and_then(Value::as_f64)
        })
        .unwrap_or(0.0)
}

/// Flatten history records into golem and vampire rows.
///
/// Non-positive vampire values mean "no reading" and are left out of the chart.
pub fn rows_from_history(history: &[Value]) -> Vec<PopulationRow> {
    let mut rows = Vec::with_capacity(history.len() * 2);

    for record in history {
        let time = record
            .get("temps")
            .or_else(|| record.get("time"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        let golem = field(record, "taille", GOLEM);
        let vampire = field(record, "vampire", VAMPIRE);

        rows.push(PopulationRow {
            time,
            species: GOLEM.to_string(),
            population: Some(golem),
        });
        rows.push(PopulationRow {
            time,
            species: VAMPIRE.to_string(),
            population: (vampire > 0.0).then_some(vampire),
        });
    }

    rows
}

pub fn species_stats(rows: &[PopulationRow]) -> BTreeMap<String, SpeciesStats> {
    let mut grouped: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in rows {
        if let Some(value) = row.population {
            grouped.entry(row.species.as_str()).or_default().push(value);
        }
    }

    grouped
        .into_iter()
        .map(|(species, values)| (species.to_string(), summarize(&values)))
        .collect()
}

fn summarize(values: &[f64]) -> SpeciesStats {
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let std = (count > 1).then(|| {
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    });

    SpeciesStats {
        count,
        min,
        max,
        mean,
        std,
    }
}
