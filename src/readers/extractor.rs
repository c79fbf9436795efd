use crate::error::Result;
use crate::models::RawDataset;
use crate::readers::{CsvReader, JsonReader};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Supported raw file encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(SourceFormat::Csv),
            "json" => Some(SourceFormat::Json),
            _ => None,
        }
    }
}

/// Reads every raw file in a directory into one unified dataset.
pub struct Extractor {
    csv_reader: CsvReader,
    json_reader: JsonReader,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            csv_reader: CsvReader::new(),
            json_reader: JsonReader::new(),
        }
    }

    /// Extract a single file; `None` when the format is not supported
    pub fn extract_file(&self, path: &Path) -> Result<Option<RawDataset>> {
        match SourceFormat::from_path(path) {
            Some(SourceFormat::Csv) => self.csv_reader.read_file(path).map(Some),
            Some(SourceFormat::Json) => self.json_reader.read_file(path).map(Some),
            None => Ok(None),
        }
    }

    /// Extract all CSV and JSON files in `raw_dir`, in path order
    pub fn extract_all(&self, raw_dir: &Path) -> Result<RawDataset> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(raw_dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        paths.sort();

        let mut combined = RawDataset::new();
        let mut files = 0usize;

        for path in &paths {
            match self.extract_file(path)? {
                Some(dataset) => {
                    combined.extend(dataset);
                    files += 1;
                }
                None => warn!("Skipping unsupported file: {}", path.display()),
            }
        }

        if files == 0 {
            error!("No CSV or JSON files found in {}", raw_dir.display());
            return Ok(combined);
        }

        info!(
            "Total extracted: {} rows from {} files",
            combined.len(),
            files
        );
        Ok(combined)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
