use crate::error::{EtlError, Result};
use crate::models::RawDataset;
use crate::readers::columns::ColumnLayout;
use crate::readers::encoding::decode_text;
use crate::utils::constants::CSV_METADATA_ROWS;
use crate::utils::filename::city_from_path;
use std::path::Path;
use tracing::info;

/// Reader for Open-Meteo CSV exports.
pub struct CsvReader {
    metadata_rows: usize,
}

impl CsvReader {
    pub fn new() -> Self {
        Self {
            metadata_rows: CSV_METADATA_ROWS,
        }
    }

    pub fn with_metadata_rows(metadata_rows: usize) -> Self {
        Self { metadata_rows }
    }

    /// Read a CSV file, tagging each row with the city (file stem) and file name
    pub fn read_file(&self, path: &Path) -> Result<RawDataset> {
        info!("Extracting CSV: {}", path.display());

        let source_file = source_file_name(path);
        let bytes = std::fs::read(path)?;
        let text = decode_text(&bytes);
        let dataset = self.parse(&text, &city_from_path(path), &source_file)?;

        info!("  -> {} rows extracted from {}", dataset.len(), source_file);
        Ok(dataset)
    }

    /// Parse CSV text: skip the metadata rows, take the next record as the header
    pub fn parse(&self, text: &str, city: &str, source_file: &str) -> Result<RawDataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        let mut rows = reader.records();

        for _ in 0..self.metadata_rows {
            if rows.next().transpose()?.is_none() {
                return Err(missing_header(source_file));
            }
        }

        let header = rows.next().transpose()?.ok_or_else(|| missing_header(source_file))?;
        let layout = ColumnLayout::from_headers(header.iter(), source_file)?;

        let mut records = Vec::new();
        for row in rows {
            let row = row?;
            records.push(layout.build_record(city, source_file, |i| {
                row.get(i).map(str::to_string)
            }));
        }

        Ok(RawDataset {
            columns: layout.columns().collect(),
            has_source_file: true,
            records,
        })
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn source_file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn missing_header(source_file: &str) -> EtlError {
    EtlError::InvalidFormat(format!("{}: missing column header row", source_file))
}
