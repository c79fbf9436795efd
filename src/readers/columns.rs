use crate::error::{EtlError, Result};
use crate::models::{Measurement, RawRecord};
use crate::utils::constants::COLUMN_TIME;
use crate::utils::filename::clean_column_name;
use tracing::debug;

/// Where each header of an input file lands in a `RawRecord`.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    time_index: usize,
    measurements: Vec<(usize, Measurement)>,
}

impl ColumnLayout {
    /// Map cleaned headers onto known columns; a file without `time` is rejected.
    pub fn from_headers<'a, I>(headers: I, source_file: &str) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut time_index = None;
        let mut measurements: Vec<(usize, Measurement)> = Vec::new();

        for (index, header) in headers.into_iter().enumerate() {
            let name = clean_column_name(header);
            if name == COLUMN_TIME {
                time_index.get_or_insert(index);
                continue;
            }
            match Measurement::from_column_name(&name) {
                Some(m) if measurements.iter().any(|(_, seen)| *seen == m) => {
                    debug!("{}: duplicate column '{}' ignored", source_file, name);
                }
                Some(m) => measurements.push((index, m)),
                None => debug!("{}: ignoring unknown column '{}'", source_file, name),
            }
        }

        let time_index = time_index.ok_or_else(|| {
            EtlError::InvalidFormat(format!("{}: no '{}' column found", source_file, COLUMN_TIME))
        })?;

        debug!(
            "{}: columns {:?}",
            source_file,
            measurements.iter().map(|(_, m)| m.column_name()).collect::<Vec<_>>()
        );

        Ok(Self {
            time_index,
            measurements,
        })
    }

    pub fn columns(&self) -> impl Iterator<Item = Measurement> + '_ {
        self.measurements.iter().map(|(_, m)| *m)
    }

    /// Assemble one row; `cell` returns the raw text at a header index, empty text counts as missing.
    pub fn build_record<F>(&self, city: &str, source_file: &str, cell: F) -> RawRecord
    where
        F: Fn(usize) -> Option<String>,
    {
        let present = |index: usize| cell(index).filter(|v| !v.trim().is_empty());

        let mut record = RawRecord {
            city: city.to_string(),
            time: present(self.time_index),
            source_file: Some(source_file.to_string()),
            ..RawRecord::default()
        };
        for (index, measurement) in &self.measurements {
            if let Some(value) = present(*index) {
                record.values.insert(*measurement, value);
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_headers() {
        let headers = ["time", "temperature_2m_max (°C)", "temp", "rain_sum (mm)"];
        let layout = ColumnLayout::from_headers(headers, "x.csv").unwrap();

        assert_eq!(
            layout.columns().collect::<Vec<_>>(),
            vec![Measurement::Temperature2mMax, Measurement::RainSum]
        );

        let cells = ["2024-01-01", "7.3", "ignored", ""];
        let record = layout.build_record("x", "x.csv", |i| cells.get(i).map(|s| s.to_string()));
        assert_eq!(record.time.as_deref(), Some("2024-01-01"));
        assert_eq!(record.value(Measurement::Temperature2mMax), Some("7.3"));
        assert_eq!(record.value(Measurement::RainSum), None);
        assert_eq!(record.source_file.as_deref(), Some("x.csv"));
    }

    #[test]
    fn test_missing_time_column_is_format_error() {
        let err = ColumnLayout::from_headers(["date", "rain_sum"], "x.csv").unwrap_err();
        assert!(matches!(err, EtlError::InvalidFormat(_)));
    }
}
