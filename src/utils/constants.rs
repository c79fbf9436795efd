/// Destination relation
pub const TABLE_NAME: &str = "weather_data";

/// Open-Meteo CSVs carry a location header and value row before the data header
pub const CSV_METADATA_ROWS: usize = 2;

/// JSON key holding the per-day column arrays
pub const JSON_DAILY_KEY: &str = "daily";

/// Column names
pub const COLUMN_TIME: &str = "time";
pub const COLUMN_CITY: &str = "city";
pub const COLUMN_SOURCE_FILE: &str = "source_file";

/// Temperature constraints (°C, inclusive)
pub const MIN_VALID_TEMP: f64 = -60.0;
pub const MAX_VALID_TEMP: f64 = 60.0;

/// Processing defaults
pub const DEFAULT_BATCH_SIZE: usize = 500;
/// Upper bound on rows per upsert statement; 12 binds per row stays under
/// SQLite's 32766 and PostgreSQL's 65535 parameter limits
pub const MAX_BATCH_SIZE: usize = 2000;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_RAW_DATA_DIR: &str = "data/raw";
pub const DEFAULT_PROCESSED_DATA_DIR: &str = "data/processed";
pub const DEFAULT_LOG_FILE: &str = "etl.log";
pub const DEFAULT_CONFIG_FILE: &str = "weather-etl.toml";

/// Database defaults for local development
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5433;
pub const DEFAULT_DB_NAME: &str = "weather_db";
pub const DEFAULT_DB_USER: &str = "etl_user";
pub const DEFAULT_DB_PASSWORD: &str = "etl_password";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
