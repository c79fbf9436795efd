//! SQL for the `weather_data` relation, per backend.

pub const POSTGRES_CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS weather_data (
    id SERIAL PRIMARY KEY,
    city VARCHAR(50) NOT NULL,
    time DATE NOT NULL,
    precipitation_sum FLOAT,
    temperature_2m_max FLOAT,
    temperature_2m_min FLOAT,
    rain_sum FLOAT,
    snowfall_sum FLOAT,
    weather_code INTEGER,
    wind_speed_10m_max FLOAT,
    temp_range FLOAT,
    month INTEGER,
    day_of_week VARCHAR(10),
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(city, time)
)
"#;

pub const SQLITE_CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS weather_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    city VARCHAR(50) NOT NULL,
    time DATE NOT NULL,
    precipitation_sum REAL,
    temperature_2m_max REAL,
    temperature_2m_min REAL,
    rain_sum REAL,
    snowfall_sum REAL,
    weather_code INTEGER,
    wind_speed_10m_max REAL,
    temp_range REAL,
    month INTEGER,
    day_of_week VARCHAR(10),
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(city, time)
)
"#;

/// Insert column list; `QueryBuilder::push_values` appends the `VALUES` tuples
pub const UPSERT_HEAD: &str = "INSERT INTO weather_data (\
    city, time, precipitation_sum, temperature_2m_max, temperature_2m_min, \
    rain_sum, snowfall_sum, weather_code, wind_speed_10m_max, \
    temp_range, month, day_of_week) ";

/// Every non-key column is overwritten; `city` and `time` never change
pub const UPSERT_CONFLICT: &str = " ON CONFLICT (city, time) DO UPDATE SET \
    precipitation_sum = EXCLUDED.precipitation_sum, \
    temperature_2m_max = EXCLUDED.temperature_2m_max, \
    temperature_2m_min = EXCLUDED.temperature_2m_min, \
    rain_sum = EXCLUDED.rain_sum, \
    snowfall_sum = EXCLUDED.snowfall_sum, \
    weather_code = EXCLUDED.weather_code, \
    wind_speed_10m_max = EXCLUDED.wind_speed_10m_max, \
    temp_range = EXCLUDED.temp_range, \
    month = EXCLUDED.month, \
    day_of_week = EXCLUDED.day_of_week";

pub const COUNT_ROWS: &str = "SELECT COUNT(*) FROM weather_data";

const SELECT_COLUMNS: &str = "SELECT city, time, precipitation_sum, temperature_2m_max, \
    temperature_2m_min, rain_sum, snowfall_sum, weather_code, wind_speed_10m_max, \
    temp_range, month, day_of_week FROM weather_data";

pub fn select_all() -> String {
    format!("{} ORDER BY city, time", SELECT_COLUMNS)
}

pub fn select_one_postgres() -> String {
    format!("{} WHERE city = $1 AND time = $2", SELECT_COLUMNS)
}

pub fn select_one_sqlite() -> String {
    format!("{} WHERE city = ? AND time = ?", SELECT_COLUMNS)
}
