use crate::error::{EtlError, Result};
use crate::models::{Measurement, Observation, ObservationSet, RawDataset};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{info, warn};

/// Drop the source-file column; it is extraction metadata, not domain data
pub fn strip_provenance(mut dataset: RawDataset) -> RawDataset {
    dataset.has_source_file = false;
    for record in &mut dataset.records {
        record.source_file = None;
    }
    dataset
}

/// Keep the first row for each (city, date) key, returning how many were removed.
///
/// Keys compare the date text as extracted, before any parsing.
pub fn remove_duplicates(mut dataset: RawDataset) -> (RawDataset, usize) {
    let before = dataset.records.len();
    let mut seen: HashSet<(String, Option<String>)> = HashSet::with_capacity(before);
    dataset
        .records
        .retain(|r| seen.insert((r.city.clone(), r.time.clone())));

    let removed = before - dataset.records.len();
    if removed > 0 {
        info!("Removed {} duplicate rows", removed);
    } else {
        info!("No duplicates found");
    }
    (dataset, removed)
}

/// Parse dates and coerce measurements into typed observations.
///
/// A date that is present but not strictly `YYYY-MM-DD` aborts the run. Rows
/// with no date at all cannot carry a key and are dropped; their count is
/// returned alongside the set.
pub fn cast_types(dataset: RawDataset) -> Result<(ObservationSet, usize)> {
    let mut observations = Vec::with_capacity(dataset.records.len());
    let mut undated = 0usize;

    for record in dataset.records {
        let Some(time) = record.time.as_deref() else {
            warn!("Dropping {} row without a date", record.city);
            undated += 1;
            continue;
        };
        let date = parse_strict_date(time).ok_or_else(|| EtlError::DateParse {
            city: record.city.clone(),
            value: time.to_string(),
        })?;

        let mut observation = Observation::new(record.city.clone(), date);
        for measurement in Measurement::ALL {
            let value = record.value(measurement).and_then(|text| {
                if measurement.is_integer() {
                    coerce_integer(text).map(f64::from)
                } else {
                    coerce_float(text)
                }
            });
            observation.set_value(measurement, value);
        }
        observations.push(observation);
    }

    info!("Type casting complete");
    Ok((ObservationSet::new(dataset.columns, observations), undated))
}

/// Parse exactly `YYYY-MM-DD`: ten characters, zero padded, a real calendar date
pub fn parse_strict_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Parse a float; anything unparsable or non-finite is missing
pub fn coerce_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an integral number (`53` or `53.0`); anything else is missing
pub fn coerce_integer(text: &str) -> Option<i32> {
    let value = coerce_float(text)?;
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return None;
    }
    Some(value as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;

    fn raw(city: &str, time: &str) -> RawRecord {
        RawRecord::new(city, time).with_source_file(format!("{}.csv", city))
    }

    #[test]
    fn test_strip_provenance() {
        let dataset = RawDataset::from_records(vec![raw("berlin", "2024-01-01")]);
        assert!(dataset.column_names().contains(&"source_file"));

        let stripped = strip_provenance(dataset);
        assert!(!stripped.column_names().contains(&"source_file"));
        assert!(stripped.records[0].source_file.is_none());
    }

    #[test]
    fn test_remove_duplicates_keeps_first() {
        let dataset = RawDataset::from_records(vec![
            raw("berlin", "2024-01-01").with_value(Measurement::RainSum, "1"),
            raw("berlin", "2024-01-01").with_value(Measurement::RainSum, "2"),
            raw("berlin", "2024-01-02").with_value(Measurement::RainSum, "3"),
        ]);

        let (result, removed) = remove_duplicates(dataset);

        assert_eq!(result.len(), 2);
        assert_eq!(removed, 1);
        assert_eq!(result.records[0].value(Measurement::RainSum), Some("1"));
        assert_eq!(result.records[1].value(Measurement::RainSum), Some("3"));
    }

    #[test]
    fn test_remove_duplicates_different_cities() {
        let dataset = RawDataset::from_records(vec![
            raw("berlin", "2024-01-01"),
            raw("cologne", "2024-01-01"),
        ]);
        let (result, removed) = remove_duplicates(dataset);
        assert_eq!(result.len(), 2);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_cast_types() -> Result<()> {
        let dataset = RawDataset::from_records(vec![raw("berlin", "2024-01-01")
            .with_value(Measurement::PrecipitationSum, "1.9")
            .with_value(Measurement::Temperature2mMax, "n/a")
            .with_value(Measurement::WeatherCode, "53.0")
            .with_value(Measurement::WindSpeed10mMax, "19.7")]);

        let (set, undated) = cast_types(dataset)?;
        let obs = &set.observations[0];

        assert_eq!(undated, 0);
        assert_eq!(obs.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(obs.precipitation_sum, Some(1.9));
        assert_eq!(obs.temperature_2m_max, None);
        assert_eq!(obs.weather_code, Some(53));
        assert_eq!(obs.wind_speed_10m_max, Some(19.7));
        assert_eq!(set.columns.len(), 4);
        Ok(())
    }

    #[test]
    fn test_cast_types_rejects_malformed_date() {
        let dataset = RawDataset::from_records(vec![
            raw("berlin", "2024-01-01"),
            raw("berlin", "01/02/2024"),
        ]);
        match cast_types(dataset) {
            Err(EtlError::DateParse { city, value }) => {
                assert_eq!(city, "berlin");
                assert_eq!(value, "01/02/2024");
            }
            other => panic!("expected date parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_cast_types_drops_undated_rows() -> Result<()> {
        let mut undated = raw("berlin", "");
        undated.time = None;
        let dataset = RawDataset::from_records(vec![raw("berlin", "2024-01-01"), undated]);

        let (set, dropped) = cast_types(dataset)?;
        assert_eq!(set.len(), 1);
        assert_eq!(dropped, 1);
        Ok(())
    }

    #[test]
    fn test_parse_strict_date() {
        assert!(parse_strict_date("2024-02-29").is_some());
        assert!(parse_strict_date("2023-02-29").is_none());
        assert!(parse_strict_date("2024-1-1").is_none());
        assert!(parse_strict_date("2024-01-01T00:00").is_none());
        assert!(parse_strict_date(" 2024-01-01").is_none());
        assert!(parse_strict_date("20240101").is_none());
    }

    #[test]
    fn test_coercion() {
        assert_eq!(coerce_float(" 3.5 "), Some(3.5));
        assert_eq!(coerce_float("-0.0"), Some(-0.0));
        assert_eq!(coerce_float("NaN"), None);
        assert_eq!(coerce_float("abc"), None);
        assert_eq!(coerce_integer("61"), Some(61));
        assert_eq!(coerce_integer("61.0"), Some(61));
        assert_eq!(coerce_integer("61.5"), None);
        assert_eq!(coerce_integer("1e12"), None);
    }
}
