pub mod database;
pub mod parquet_writer;
pub mod schema;

pub use database::{StoredRecord, WeatherStore};
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};
