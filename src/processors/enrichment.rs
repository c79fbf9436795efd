use crate::models::{ObservationSet, WeatherRecord};
use tracing::info;

/// Compute `temp_range`, `month` and `day_of_week`, preserving row order
pub fn add_computed_columns(set: ObservationSet) -> Vec<WeatherRecord> {
    let records: Vec<WeatherRecord> = set
        .observations
        .into_iter()
        .map(WeatherRecord::from_observation)
        .collect();

    info!("Added computed columns: temp_range, month, day_of_week");
    records
}
