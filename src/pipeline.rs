//! Extract → transform → load, one stage at a time.

use crate::error::Result;
use crate::models::RawDataset;
use crate::processors::{TransformReport, Transformer};
use crate::readers::Extractor;
use crate::utils::progress::ProgressReporter;
use crate::writers::{ParquetWriter, WeatherStore};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Parquet snapshot of the validated records
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub path: PathBuf,
    pub compression: String,
}

/// Outcome of one full run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub extracted_rows: usize,
    pub records_loaded: usize,
    /// `None` when the run stopped before reaching storage
    pub total_rows: Option<i64>,
    pub report: Option<TransformReport>,
    pub exported_to: Option<PathBuf>,
}

impl RunSummary {
    pub fn reached_storage(&self) -> bool {
        self.total_rows.is_some()
    }
}

pub struct EtlPipeline<'a> {
    extractor: Extractor,
    transformer: Transformer,
    store: &'a WeatherStore,
    export: Option<ExportOptions>,
}

impl<'a> EtlPipeline<'a> {
    pub fn new(store: &'a WeatherStore) -> Self {
        Self {
            extractor: Extractor::new(),
            transformer: Transformer::new(),
            store,
            export: None,
        }
    }

    pub fn with_transformer(mut self, transformer: Transformer) -> Self {
        self.transformer = transformer;
        self
    }

    pub fn with_export(mut self, export: Option<ExportOptions>) -> Self {
        self.export = export;
        self
    }

    /// Run every stage over the files in `raw_dir`.
    ///
    /// An empty extraction is logged and ends the run without touching storage.
    pub async fn run(
        &self,
        raw_dir: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<RunSummary> {
        info!("ETL pipeline started");

        set_progress(progress, "Extracting raw files...");
        let dataset = self.extractor.extract_all(raw_dir)?;
        let mut summary = RunSummary {
            extracted_rows: dataset.len(),
            ..Default::default()
        };

        if dataset.is_empty() {
            error!("No data extracted from {}. Aborting.", raw_dir.display());
            return Ok(summary);
        }

        self.transform_and_load(dataset, &mut summary, progress)
            .await?;

        info!(
            "ETL pipeline finished: {} rows loaded, {} total",
            summary.records_loaded,
            summary.total_rows.unwrap_or_default()
        );
        Ok(summary)
    }

    async fn transform_and_load(
        &self,
        dataset: RawDataset,
        summary: &mut RunSummary,
        progress: Option<&ProgressReporter>,
    ) -> Result<()> {
        set_progress(progress, "Transforming records...");
        let (records, report) = self.transformer.transform(dataset)?;

        if let Some(export) = &self.export {
            set_progress(progress, "Exporting Parquet snapshot...");
            let writer = ParquetWriter::new().with_compression(&export.compression)?;
            writer.write_records(&records, &export.path)?;
            summary.exported_to = Some(export.path.clone());
        }

        set_progress(progress, "Loading into database...");
        summary.records_loaded = self.store.load(&records).await?;
        summary.total_rows = Some(self.store.row_count().await?);
        summary.report = Some(report);
        Ok(())
    }
}

fn set_progress(progress: Option<&ProgressReporter>, message: &str) {
    if let Some(progress) = progress {
        progress.set_message(message);
    }
}
