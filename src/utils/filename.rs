use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Derive the city identifier from a raw file path, e.g. `data/raw/Berlin.csv` -> `berlin`
pub fn city_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Strip the unit suffix from a column header, e.g. `temperature_2m_max (°C)` -> `temperature_2m_max`
pub fn clean_column_name(name: &str) -> String {
    name.split('(')
        .next()
        .unwrap_or_default()
        .trim()
        .replace(' ', "_")
}

/// Generate default export filename with format: {dir}/weather-{YYMMDD}.parquet
pub fn generate_default_export_filename(processed_dir: &Path) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!("weather-{:02}{:02}{:02}.parquet", year, month, day);
    processed_dir.join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_from_path() {
        assert_eq!(city_from_path(Path::new("data/raw/berlin.csv")), "berlin");
        assert_eq!(city_from_path(Path::new("Test_City.json")), "test_city");
    }

    #[test]
    fn test_clean_column_name() {
        assert_eq!(clean_column_name("temperature_2m_max (°C)"), "temperature_2m_max");
        assert_eq!(clean_column_name("rain_sum (mm)"), "rain_sum");
        assert_eq!(clean_column_name("time"), "time");
        assert_eq!(clean_column_name(" wind speed 10m max (km/h)"), "wind_speed_10m_max");
    }

    #[test]
    fn test_generate_default_export_filename() {
        let filename = generate_default_export_filename(Path::new("data/processed"));
        let filename_str = filename.to_string_lossy();

        assert!(filename_str.starts_with("data/processed/weather-"));
        assert!(filename_str.ends_with(".parquet"));

        let file_part = filename.file_name().unwrap().to_string_lossy().to_string();
        // weather- + YYMMDD + .parquet
        assert_eq!(file_part.len(), "weather-".len() + 6 + ".parquet".len());
    }
}
