use crate::error::{EtlError, Result};
use crate::models::WeatherRecord;
use crate::utils::constants::*;
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::Datelike;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Date32 counts days since 1970-01-01
const DAYS_FROM_CE_TO_UNIX_EPOCH: i32 = 719_163;

/// Writes processed records to a Parquet snapshot
pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(EtlError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    /// Write records to a Parquet file; an empty slice writes nothing
    pub fn write_records(&self, records: &[WeatherRecord], path: &Path) -> Result<()> {
        self.write_records_batched(records, path, records.len().max(1))
    }

    /// Write records one Arrow batch per `batch_size` chunk
    pub fn write_records_batched(
        &self,
        records: &[WeatherRecord],
        path: &Path,
        batch_size: usize,
    ) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let schema = Self::create_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        for chunk in records.chunks(batch_size.max(1)) {
            let batch = Self::records_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }
        writer.close()?;

        info!("Exported {} rows to {}", records.len(), path.display());
        Ok(())
    }

    /// Mirrors the `weather_data` columns
    fn create_schema() -> Arc<Schema> {
        let fields = vec![
            Field::new(COLUMN_CITY, DataType::Utf8, false),
            Field::new(COLUMN_TIME, DataType::Date32, false),
            Field::new("precipitation_sum", DataType::Float64, true),
            Field::new("temperature_2m_max", DataType::Float64, true),
            Field::new("temperature_2m_min", DataType::Float64, true),
            Field::new("rain_sum", DataType::Float64, true),
            Field::new("snowfall_sum", DataType::Float64, true),
            Field::new("weather_code", DataType::Int32, true),
            Field::new("wind_speed_10m_max", DataType::Float64, true),
            Field::new("temp_range", DataType::Float64, true),
            Field::new("month", DataType::Int32, false),
            Field::new("day_of_week", DataType::Utf8, false),
        ];

        Arc::new(Schema::new(fields))
    }

    fn records_to_batch(records: &[WeatherRecord], schema: Arc<Schema>) -> Result<RecordBatch> {
        let cities: Vec<&str> = records.iter().map(|r| r.city()).collect();
        let dates: Vec<i32> = records
            .iter()
            .map(|r| r.date().num_days_from_ce() - DAYS_FROM_CE_TO_UNIX_EPOCH)
            .collect();
        let floats = |f: fn(&WeatherRecord) -> Option<f64>| -> ArrayRef {
            Arc::new(Float64Array::from(records.iter().map(f).collect::<Vec<_>>()))
        };
        let weather_codes: Vec<Option<i32>> =
            records.iter().map(|r| r.observation.weather_code).collect();
        let months: Vec<i32> = records.iter().map(|r| r.month() as i32).collect();
        let days: Vec<&str> = records.iter().map(|r| r.day_of_week_name()).collect();

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(cities)),
                Arc::new(Date32Array::from(dates)),
                floats(|r| r.observation.precipitation_sum),
                floats(|r| r.observation.temperature_2m_max),
                floats(|r| r.observation.temperature_2m_min),
                floats(|r| r.observation.rain_sum),
                floats(|r| r.observation.snowfall_sum),
                Arc::new(Int32Array::from(weather_codes)),
                floats(|r| r.observation.wind_speed_10m_max),
                floats(|r| r.temp_range()),
                Arc::new(Int32Array::from(months)),
                Arc::new(StringArray::from(days)),
            ],
        )?;

        Ok(batch)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let total_rows = metadata.file_metadata().num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0,
            self.compression,
            self.total_rows as f64 / self.row_groups.max(1) as f64
        )
    }
}
