use crate::models::{Measurement, MissingStrategy, ObservationSet};
use tracing::info;

/// What the missing-value stage found and did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissingValueSummary {
    pub missing_values: usize,
    pub rows_dropped: usize,
    pub values_filled: usize,
}

/// Apply the configured missing-value strategy over the dataset's present columns
pub fn handle_missing_values(
    mut set: ObservationSet,
    strategy: MissingStrategy,
) -> (ObservationSet, MissingValueSummary) {
    let mut summary = MissingValueSummary {
        missing_values: set
            .observations
            .iter()
            .map(|o| o.missing_count(&set.columns))
            .sum(),
        ..Default::default()
    };

    if summary.missing_values == 0 {
        info!("No missing values found");
        return (set, summary);
    }

    info!(
        "Found {} missing values, strategy: {}",
        summary.missing_values, strategy
    );

    match strategy {
        MissingStrategy::Drop => {
            let before = set.observations.len();
            let columns = &set.columns;
            set.observations.retain(|o| !o.has_missing(columns));
            summary.rows_dropped = before - set.observations.len();
            info!("Dropped {} rows with missing values", summary.rows_dropped);
        }
        MissingStrategy::FillZero => {
            let columns: Vec<Measurement> = set.columns.iter().copied().collect();
            summary.values_filled = fill_columns(&mut set, &columns, |_| Some(0.0));
        }
        MissingStrategy::FillMean => {
            let columns: Vec<Measurement> = set.columns.iter().copied().collect();
            let means: Vec<(Measurement, Option<f64>)> = columns
                .iter()
                .map(|m| (*m, column_mean(&set, *m)))
                .collect();
            summary.values_filled = fill_columns(&mut set, &columns, |m| {
                means
                    .iter()
                    .find(|(column, _)| *column == m)
                    .and_then(|(_, mean)| *mean)
            });
        }
    }

    (set, summary)
}

/// Arithmetic mean of the non-missing values in a column
pub fn column_mean(set: &ObservationSet, measurement: Measurement) -> Option<f64> {
    let (sum, count) = set
        .observations
        .iter()
        .filter_map(|o| o.value(measurement))
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn fill_columns<F>(set: &mut ObservationSet, columns: &[Measurement], fill_value: F) -> usize
where
    F: Fn(Measurement) -> Option<f64>,
{
    let mut filled = 0;
    for observation in &mut set.observations {
        for measurement in columns {
            if observation.value(*measurement).is_none() {
                if let Some(value) = fill_value(*measurement) {
                    observation.set_value(*measurement, Some(value));
                    filled += 1;
                }
            }
        }
    }
    filled
}
