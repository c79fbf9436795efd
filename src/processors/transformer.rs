use crate::error::Result;
use crate::models::{MissingStrategy, RawDataset, WeatherRecord};
use crate::processors::cleaning::{cast_types, remove_duplicates, strip_provenance};
use crate::processors::enrichment::add_computed_columns;
use crate::processors::missing_values::{handle_missing_values, MissingValueSummary};
use crate::processors::validation::{validate_precipitation, validate_temperature, TemperatureRejection};
use tracing::info;

/// Counts and rejections gathered over one transform run
#[derive(Debug, Clone, Default)]
pub struct TransformReport {
    pub input_rows: usize,
    pub duplicates_removed: usize,
    pub undated_dropped: usize,
    pub missing: MissingValueSummary,
    pub temperature_rejections: Vec<TemperatureRejection>,
    pub precipitation_rejected: usize,
    pub output_rows: usize,
}

impl TransformReport {
    pub fn rows_rejected(&self) -> usize {
        self.temperature_rejections.len() + self.precipitation_rejected
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Transform Report ===\n");
        summary.push_str(&format!("Input Rows: {}\n", self.input_rows));
        summary.push_str(&format!("Duplicates Removed: {}\n", self.duplicates_removed));
        if self.undated_dropped > 0 {
            summary.push_str(&format!("Rows Without Date: {}\n", self.undated_dropped));
        }
        summary.push_str(&format!(
            "Missing Values: {} (rows dropped: {}, values filled: {})\n",
            self.missing.missing_values, self.missing.rows_dropped, self.missing.values_filled
        ));
        summary.push_str(&format!(
            "Temperature Rejections: {}\n",
            self.temperature_rejections.len()
        ));
        summary.push_str(&format!(
            "Precipitation Rejections: {}\n",
            self.precipitation_rejected
        ));
        summary.push_str(&format!("Output Rows: {}\n", self.output_rows));

        if !self.temperature_rejections.is_empty() {
            summary.push_str("\nTop 10 Temperature Rejections:\n");
            for (i, rejection) in self.temperature_rejections.iter().take(10).enumerate() {
                summary.push_str(&format!("  {}. {}\n", i + 1, rejection));
            }
        }

        summary
    }
}

/// Runs the cleaning, validation and enrichment stages in their fixed order.
pub struct Transformer {
    missing_strategy: MissingStrategy,
}

impl Transformer {
    pub fn new() -> Self {
        Self {
            missing_strategy: MissingStrategy::default(),
        }
    }

    pub fn with_missing_strategy(mut self, missing_strategy: MissingStrategy) -> Self {
        self.missing_strategy = missing_strategy;
        self
    }

    /// Transform a raw dataset into validated, enriched records.
    ///
    /// Fails only on a malformed date; every data-quality problem is handled
    /// by filtering or substitution and recorded in the report.
    pub fn transform(&self, dataset: RawDataset) -> Result<(Vec<WeatherRecord>, TransformReport)> {
        let mut report = TransformReport {
            input_rows: dataset.len(),
            ..Default::default()
        };
        info!("Starting transform: {} rows", report.input_rows);

        let dataset = strip_provenance(dataset);

        let (dataset, duplicates) = remove_duplicates(dataset);
        report.duplicates_removed = duplicates;

        let (set, undated) = cast_types(dataset)?;
        report.undated_dropped = undated;

        let (set, missing) = handle_missing_values(set, self.missing_strategy);
        report.missing = missing;

        let (set, rejections) = validate_temperature(set);
        report.temperature_rejections = rejections;

        let (set, precipitation_rejected) = validate_precipitation(set);
        report.precipitation_rejected = precipitation_rejected;

        let records = add_computed_columns(set);
        report.output_rows = records.len();

        info!("Transform complete: {} rows remaining", report.output_rows);
        Ok((records, report))
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}
