use crate::error::{EtlError, Result};
use crate::models::RawDataset;
use crate::readers::columns::ColumnLayout;
use crate::readers::csv_reader::source_file_name;
use crate::readers::encoding::decode_text;
use crate::utils::constants::JSON_DAILY_KEY;
use crate::utils::filename::city_from_path;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Reader for Open-Meteo JSON responses (`{"daily": {"time": [...], ...}}`).
pub struct JsonReader;

impl JsonReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_file(&self, path: &Path) -> Result<RawDataset> {
        info!("Extracting JSON: {}", path.display());

        let source_file = source_file_name(path);
        let bytes = std::fs::read(path)?;
        let text = decode_text(&bytes);
        let dataset = self.parse(&text, &city_from_path(path), &source_file)?;

        info!("  -> {} rows extracted from {}", dataset.len(), source_file);
        Ok(dataset)
    }

    pub fn parse(&self, text: &str, city: &str, source_file: &str) -> Result<RawDataset> {
        let document: Value = serde_json::from_str(text)?;

        let daily = match document.get(JSON_DAILY_KEY) {
            Some(Value::Object(daily)) if !daily.is_empty() => daily,
            Some(Value::Object(_)) | None => {
                warn!("{}: no '{}' data found", source_file, JSON_DAILY_KEY);
                return Ok(RawDataset::new());
            }
            Some(_) => {
                return Err(EtlError::InvalidFormat(format!(
                    "{}: '{}' is not an object",
                    source_file, JSON_DAILY_KEY
                )))
            }
        };

        let mut headers = Vec::with_capacity(daily.len());
        let mut series = Vec::with_capacity(daily.len());
        for (name, values) in daily {
            let values = values.as_array().ok_or_else(|| {
                EtlError::InvalidFormat(format!("{}: column '{}' is not an array", source_file, name))
            })?;
            headers.push(name.as_str());
            series.push(values);
        }

        let row_count = series.first().map_or(0, |s| s.len());
        if let Some(pos) = series.iter().position(|s| s.len() != row_count) {
            return Err(EtlError::InvalidFormat(format!(
                "{}: column '{}' has {} values, expected {}",
                source_file,
                headers[pos],
                series[pos].len(),
                row_count
            )));
        }

        let layout = ColumnLayout::from_headers(headers.iter().copied(), source_file)?;
        let records = (0..row_count)
            .map(|row| {
                layout.build_record(city, source_file, |col| {
                    series.get(col).and_then(|s| cell_text(&s[row]))
                })
            })
            .collect();

        Ok(RawDataset {
            columns: layout.columns().collect(),
            has_source_file: true,
            records,
        })
    }
}

impl Default for JsonReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Textual form of a JSON cell; `null` is missing
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Measurement;

    #[test]
    fn test_parse_daily_block() -> Result<()> {
        let text = r#"{
            "latitude": 52.5,
            "daily": {
                "time": ["2024-01-01", "2024-01-02"],
                "temperature_2m_max (°C)": [7.3, 7.2],
                "precipitation_sum (mm)": [1.9, null],
                "weather_code (wmo code)": [53, 61]
            }
        }"#;
        let dataset = JsonReader::new().parse(text, "test_city", "test_city.json")?;

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.columns.len(), 3);
        let first = &dataset.records[0];
        assert_eq!(first.city, "test_city");
        assert_eq!(first.time.as_deref(), Some("2024-01-01"));
        assert_eq!(first.value(Measurement::Temperature2mMax), Some("7.3"));
        assert_eq!(first.value(Measurement::WeatherCode), Some("53"));
        assert_eq!(dataset.records[1].value(Measurement::PrecipitationSum), None);
        Ok(())
    }

    #[test]
    fn test_missing_daily_yields_empty_dataset() -> Result<()> {
        let dataset = JsonReader::new().parse(r#"{"hourly": {}}"#, "x", "x.json")?;
        assert!(dataset.is_empty());
        Ok(())
    }

    #[test]
    fn test_ragged_columns_are_format_error() {
        let text = r#"{"daily": {"time": ["2024-01-01"], "rain_sum": [1.0, 2.0]}}"#;
        let err = JsonReader::new().parse(text, "x", "x.json").unwrap_err();
        assert!(matches!(err, EtlError::InvalidFormat(_)));
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = JsonReader::new().parse("{not json", "x", "x.json").unwrap_err();
        assert!(matches!(err, EtlError::Json(_)));
    }
}
