use crate::models::Measurement;
use std::collections::{BTreeMap, BTreeSet};

/// One extracted row, values still as text exactly as the file carried them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    pub city: String,
    pub time: Option<String>,
    pub source_file: Option<String>,
    pub values: BTreeMap<Measurement, String>,
}

impl RawRecord {
    pub fn new(city: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            time: Some(time.into()),
            source_file: None,
            values: BTreeMap::new(),
        }
    }

    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }

    pub fn with_value(mut self, measurement: Measurement, value: impl Into<String>) -> Self {
        self.values.insert(measurement, value.into());
        self
    }

    pub fn value(&self, measurement: Measurement) -> Option<&str> {
        self.values.get(&measurement).map(String::as_str)
    }
}

/// The unified table produced by extraction.
///
/// `columns` is the union of measurement columns seen across every input file;
/// a row lacking a value in one of them counts as missing in that column.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub columns: BTreeSet<Measurement>,
    pub has_source_file: bool,
    pub records: Vec<RawRecord>,
}

impl RawDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset whose column set is inferred from the records themselves
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        let columns = records
            .iter()
            .flat_map(|r| r.values.keys().copied())
            .collect();
        let has_source_file = records.iter().any(|r| r.source_file.is_some());
        Self {
            columns,
            has_source_file,
            records,
        }
    }

    /// Append another dataset, widening the column set
    pub fn extend(&mut self, other: RawDataset) {
        self.columns.extend(other.columns);
        self.has_source_file |= other.has_source_file;
        self.records.extend(other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column names in table order, the way a tabular view would list them
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut names = vec![
            crate::utils::constants::COLUMN_TIME,
            crate::utils::constants::COLUMN_CITY,
        ];
        names.extend(self.columns.iter().map(|m| m.column_name()));
        if self.has_source_file {
            names.push(crate::utils::constants::COLUMN_SOURCE_FILE);
        }
        names
    }
}
