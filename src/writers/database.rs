use crate::config::DatabaseSettings;
use crate::error::Result;
use crate::models::WeatherRecord;
use crate::utils::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_MAX_CONNECTIONS, MAX_BATCH_SIZE, TABLE_NAME,
};
use crate::writers::schema;
use chrono::NaiveDate;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Database, Encode, PgPool, Postgres, QueryBuilder, Sqlite, SqlitePool, Type};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// A row as persisted in `weather_data`
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StoredRecord {
    pub city: String,
    pub time: NaiveDate,
    pub precipitation_sum: Option<f64>,
    pub temperature_2m_max: Option<f64>,
    pub temperature_2m_min: Option<f64>,
    pub rain_sum: Option<f64>,
    pub snowfall_sum: Option<f64>,
    pub weather_code: Option<i32>,
    pub wind_speed_10m_max: Option<f64>,
    pub temp_range: Option<f64>,
    pub month: Option<i32>,
    pub day_of_week: Option<String>,
}

enum Backend {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

/// Durable store for validated records.
///
/// Each operation checks a connection out of the pool and returns it when the
/// operation ends, whichever way it ends.
pub struct WeatherStore {
    backend: Backend,
    batch_size: usize,
}

impl WeatherStore {
    /// Build a store from settings. No connection is opened until first use.
    pub fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let max_connections = settings.max_connections.max(1);

        let backend = match settings.url.as_deref() {
            Some(url) if url.starts_with("sqlite:") => {
                let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
                let pool_options = SqlitePoolOptions::new().acquire_timeout(ACQUIRE_TIMEOUT);
                // Each in-memory connection is its own database; keep exactly one alive
                let pool_options = if is_in_memory(url) {
                    pool_options
                        .max_connections(1)
                        .min_connections(1)
                        .idle_timeout(None)
                        .max_lifetime(None)
                } else {
                    pool_options.max_connections(max_connections)
                };
                Backend::Sqlite(pool_options.connect_lazy_with(options))
            }
            Some(url) => {
                let options = PgConnectOptions::from_str(url)?;
                Backend::Postgres(pg_pool(options, max_connections))
            }
            None => {
                let options = PgConnectOptions::new()
                    .host(&settings.host)
                    .port(settings.port)
                    .database(&settings.name)
                    .username(&settings.user)
                    .password(&settings.password);
                Backend::Postgres(pg_pool(options, max_connections))
            }
        };

        Ok(Self {
            backend,
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    /// Open (creating if needed) a SQLite database file
    pub fn open_sqlite(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);

        Ok(Self {
            backend: Backend::Sqlite(pool),
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    /// Rows per upsert statement, clamped to `1..=MAX_BATCH_SIZE`; all
    /// statements of a load share one transaction
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Postgres(_) => "postgres",
            Backend::Sqlite(_) => "sqlite",
        }
    }

    /// Create `weather_data` with its (city, time) uniqueness constraint if absent
    pub async fn ensure_schema(&self) -> Result<()> {
        match &self.backend {
            Backend::Postgres(pool) => {
                sqlx::query(schema::POSTGRES_CREATE_TABLE).execute(pool).await?;
            }
            Backend::Sqlite(pool) => {
                sqlx::query(schema::SQLITE_CREATE_TABLE).execute(pool).await?;
            }
        }
        info!("Table '{}' ready", TABLE_NAME);
        Ok(())
    }

    /// Upsert every record in a single transaction.
    ///
    /// Returns the number of records presented; overwrites count the same as
    /// fresh inserts. On any failure nothing from this call is committed.
    pub async fn load(&self, records: &[WeatherRecord]) -> Result<usize> {
        self.ensure_schema().await?;

        if records.is_empty() {
            info!("No rows to load into {}", TABLE_NAME);
            return Ok(0);
        }

        let result = match &self.backend {
            Backend::Postgres(pool) => upsert_postgres(pool, records, self.batch_size).await,
            Backend::Sqlite(pool) => upsert_sqlite(pool, records, self.batch_size).await,
        };

        match result {
            Ok(()) => {
                info!("Loaded {} rows into {} (upsert)", records.len(), TABLE_NAME);
                Ok(records.len())
            }
            Err(e) => {
                error!("Load failed: {}", e);
                Err(e)
            }
        }
    }

    /// Current total of persisted records
    pub async fn row_count(&self) -> Result<i64> {
        let count = match &self.backend {
            Backend::Postgres(pool) => {
                sqlx::query_scalar::<_, i64>(schema::COUNT_ROWS)
                    .fetch_one(pool)
                    .await?
            }
            Backend::Sqlite(pool) => {
                sqlx::query_scalar::<_, i64>(schema::COUNT_ROWS)
                    .fetch_one(pool)
                    .await?
            }
        };
        Ok(count)
    }

    pub async fn find(&self, city: &str, date: NaiveDate) -> Result<Option<StoredRecord>> {
        let record = match &self.backend {
            Backend::Postgres(pool) => {
                sqlx::query_as::<_, StoredRecord>(&schema::select_one_postgres())
                    .bind(city)
                    .bind(date)
                    .fetch_optional(pool)
                    .await?
            }
            Backend::Sqlite(pool) => {
                sqlx::query_as::<_, StoredRecord>(&schema::select_one_sqlite())
                    .bind(city)
                    .bind(date)
                    .fetch_optional(pool)
                    .await?
            }
        };
        Ok(record)
    }

    /// All persisted records ordered by city, then date
    pub async fn fetch_all(&self) -> Result<Vec<StoredRecord>> {
        let records = match &self.backend {
            Backend::Postgres(pool) => {
                sqlx::query_as::<_, StoredRecord>(&schema::select_all())
                    .fetch_all(pool)
                    .await?
            }
            Backend::Sqlite(pool) => {
                sqlx::query_as::<_, StoredRecord>(&schema::select_all())
                    .fetch_all(pool)
                    .await?
            }
        };
        Ok(records)
    }

    /// Close the pool, waiting for checked-out connections to come back
    pub async fn close(&self) {
        match &self.backend {
            Backend::Postgres(pool) => pool.close().await,
            Backend::Sqlite(pool) => pool.close().await,
        }
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn pg_pool(options: PgConnectOptions, max_connections: u32) -> PgPool {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy_with(options)
}

async fn upsert_postgres(pool: &PgPool, records: &[WeatherRecord], batch_size: usize) -> Result<()> {
    let mut tx = pool.begin().await?;
    for (i, chunk) in records.chunks(batch_size).enumerate() {
        let mut builder = QueryBuilder::<Postgres>::new(schema::UPSERT_HEAD);
        push_upsert(&mut builder, chunk);
        builder.build().execute(&mut *tx).await?;
        debug!("Upserted batch {} ({} rows)", i + 1, chunk.len());
    }
    tx.commit().await?;
    Ok(())
}

async fn upsert_sqlite(pool: &SqlitePool, records: &[WeatherRecord], batch_size: usize) -> Result<()> {
    let mut tx = pool.begin().await?;
    for (i, chunk) in records.chunks(batch_size).enumerate() {
        let mut builder = QueryBuilder::<Sqlite>::new(schema::UPSERT_HEAD);
        push_upsert(&mut builder, chunk);
        builder.build().execute(&mut *tx).await?;
        debug!("Upserted batch {} ({} rows)", i + 1, chunk.len());
    }
    tx.commit().await?;
    Ok(())
}

/// Append the `VALUES` tuples and conflict clause for one batch
fn push_upsert<'args, DB>(builder: &mut QueryBuilder<'args, DB>, records: &[WeatherRecord])
where
    DB: Database,
    String: Encode<'args, DB> + Type<DB>,
    NaiveDate: Encode<'args, DB> + Type<DB>,
    i32: Encode<'args, DB> + Type<DB>,
    Option<f64>: Encode<'args, DB> + Type<DB>,
    Option<i32>: Encode<'args, DB> + Type<DB>,
{
    builder.push_values(records, |mut row, record| {
        let obs = &record.observation;
        row.push_bind(obs.city.clone())
            .push_bind(obs.date)
            .push_bind(obs.precipitation_sum)
            .push_bind(obs.temperature_2m_max)
            .push_bind(obs.temperature_2m_min)
            .push_bind(obs.rain_sum)
            .push_bind(obs.snowfall_sum)
            .push_bind(obs.weather_code)
            .push_bind(obs.wind_speed_10m_max)
            .push_bind(record.temp_range())
            .push_bind(record.month() as i32)
            .push_bind(record.day_of_week_name().to_string());
    });
    builder.push(schema::UPSERT_CONFLICT);
}
