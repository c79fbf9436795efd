use chrono::{Datelike, NaiveDate};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use weather_etl::models::{weekday_name, MissingStrategy};
use weather_etl::pipeline::{EtlPipeline, ExportOptions};
use weather_etl::processors::Transformer;
use weather_etl::readers::Extractor;
use weather_etl::writers::{ParquetWriter, WeatherStore};

const BERLIN_CSV: &str = "\
latitude,longitude,elevation,utc_offset_seconds,timezone,timezone_abbreviation
52.52,13.41,38.0,3600,Europe/Berlin,CET
time,weather_code (wmo code),temperature_2m_max (°C),temperature_2m_min (°C),precipitation_sum (mm),rain_sum (mm),snowfall_sum (cm),wind_speed_10m_max (km/h)
2024-01-01,53,7.3,3.4,1.9,1.9,0.00,19.7
2024-01-02,61,7.2,2.5,8.5,8.5,0.00,22.1
2024-01-02,3,9.9,1.1,0.0,0.0,0.00,10.0
2024-01-03,63,10.6,7.2,10.8,10.8,0.00,25.4
2024-01-04,1,100.0,3.4,0.0,0.0,0.00,8.0
2024-01-05,1,4.0,-1.0,-2.0,0.0,0.00,8.0
";

const COLOGNE_JSON: &str = r#"{
  "latitude": 50.94,
  "longitude": 6.96,
  "daily": {
    "time": ["2024-01-01", "2024-01-02"],
    "weather_code": [3, null],
    "temperature_2m_max": [8.0, 6.5],
    "temperature_2m_min": [4.0, 1.5],
    "precipitation_sum": [0.0, 2.0],
    "rain_sum": [0.0, 2.0],
    "snowfall_sum": [0.0, 0.0],
    "wind_speed_10m_max": [12.0, 14.0]
  }
}"#;

fn write_raw_files(dir: &Path) {
    fs::write(dir.join("Berlin.csv"), BERLIN_CSV).unwrap();
    fs::write(dir.join("cologne.json"), COLOGNE_JSON).unwrap();
    fs::write(dir.join("README.txt"), "not weather data").unwrap();
}

struct Fixture {
    _root: TempDir,
    raw_dir: std::path::PathBuf,
    store: WeatherStore,
}

fn fixture() -> Fixture {
    let root = TempDir::new().expect("Failed to create temp directory");
    let raw_dir = root.path().join("raw");
    fs::create_dir_all(&raw_dir).unwrap();
    write_raw_files(&raw_dir);
    let store = WeatherStore::open_sqlite(&root.path().join("weather.db")).unwrap();
    Fixture {
        _root: root,
        raw_dir,
        store,
    }
}

#[tokio::test]
async fn test_extract_both_formats() {
    let f = fixture();
    let dataset = Extractor::new().extract_all(&f.raw_dir).unwrap();

    assert_eq!(dataset.len(), 8);
    let cities: Vec<&str> = dataset.records.iter().map(|r| r.city.as_str()).collect();
    assert_eq!(&cities[..2], &["berlin", "berlin"]);
    assert_eq!(cities[7], "cologne");
    assert!(dataset.has_source_file);
}

#[tokio::test]
async fn test_full_run_loads_valid_rows() {
    let f = fixture();
    let summary = EtlPipeline::new(&f.store)
        .run(&f.raw_dir, None)
        .await
        .unwrap();

    let report = summary.report.expect("transform report");
    assert_eq!(summary.extracted_rows, 8);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.temperature_rejections.len(), 1);
    assert_eq!(report.precipitation_rejected, 1);
    // cologne 2024-01-02 has no weather code and the default strategy drops it
    assert_eq!(report.missing.rows_dropped, 1);
    assert_eq!(summary.records_loaded, 4);
    assert_eq!(summary.total_rows, Some(4));

    let stored = f.store.fetch_all().await.unwrap();
    let keys: Vec<(String, String)> = stored
        .iter()
        .map(|r| (r.city.clone(), r.time.to_string()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("berlin".to_string(), "2024-01-01".to_string()),
            ("berlin".to_string(), "2024-01-02".to_string()),
            ("berlin".to_string(), "2024-01-03".to_string()),
            ("cologne".to_string(), "2024-01-01".to_string()),
        ]
    );

    // first occurrence of the duplicated key wins
    let jan2 = f
        .store
        .find("berlin", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(jan2.weather_code, Some(61));
    assert_eq!(jan2.temperature_2m_max, Some(7.2));
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let f = fixture();
    let pipeline = EtlPipeline::new(&f.store);

    let first = pipeline.run(&f.raw_dir, None).await.unwrap();
    let second = pipeline.run(&f.raw_dir, None).await.unwrap();

    assert_eq!(first.total_rows, Some(4));
    assert_eq!(second.total_rows, Some(4));
    assert_eq!(second.records_loaded, 4);
}

#[tokio::test]
async fn test_stored_rows_hold_invariants() {
    let f = fixture();
    EtlPipeline::new(&f.store)
        .with_transformer(Transformer::new().with_missing_strategy(MissingStrategy::FillMean))
        .run(&f.raw_dir, None)
        .await
        .unwrap();

    let stored = f.store.fetch_all().await.unwrap();
    assert_eq!(stored.len(), 5);

    for record in &stored {
        let max = record.temperature_2m_max.unwrap();
        let min = record.temperature_2m_min.unwrap();
        assert!((-60.0..=60.0).contains(&max));
        assert!((-60.0..=60.0).contains(&min));

        for value in [record.precipitation_sum, record.rain_sum, record.snowfall_sum]
            .into_iter()
            .flatten()
        {
            assert!(value >= 0.0);
        }

        assert_eq!(record.temp_range, Some(max - min));
        assert_eq!(record.month, Some(record.time.month() as i32));
        assert_eq!(
            record.day_of_week.as_deref(),
            Some(weekday_name(record.time.weekday()))
        );
    }

    // mean of 53, 61, 63, 1, 1, 3 rounded; rejected rows still count toward it
    let filled = stored
        .iter()
        .find(|r| r.city == "cologne" && r.time.day() == 2)
        .unwrap();
    assert_eq!(filled.weather_code, Some(30));
}

#[tokio::test]
async fn test_empty_directory_stops_before_storage() {
    let root = TempDir::new().unwrap();
    let raw_dir = root.path().join("raw");
    fs::create_dir_all(&raw_dir).unwrap();
    let store = WeatherStore::open_sqlite(&root.path().join("weather.db")).unwrap();

    let summary = EtlPipeline::new(&store).run(&raw_dir, None).await.unwrap();

    assert_eq!(summary.extracted_rows, 0);
    assert!(!summary.reached_storage());
    assert!(summary.report.is_none());
    assert!(!root.path().join("weather.db").exists());
}

#[tokio::test]
async fn test_malformed_date_aborts_before_load() {
    let f = fixture();
    fs::write(
        f.raw_dir.join("hamburg.csv"),
        "a,b\n1,2\ntime,temperature_2m_max (°C)\n01/02/2024,5.0\n",
    )
    .unwrap();
    f.store.ensure_schema().await.unwrap();

    let result = EtlPipeline::new(&f.store).run(&f.raw_dir, None).await;

    assert!(result.is_err());
    assert_eq!(f.store.row_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_run_with_parquet_export() {
    let f = fixture();
    let export_path = f.raw_dir.parent().unwrap().join("processed").join("weather.parquet");

    let summary = EtlPipeline::new(&f.store)
        .with_export(Some(ExportOptions {
            path: export_path.clone(),
            compression: "zstd".to_string(),
        }))
        .run(&f.raw_dir, None)
        .await
        .unwrap();

    assert_eq!(summary.exported_to.as_deref(), Some(export_path.as_path()));
    let file_info = ParquetWriter::new().get_file_info(&export_path).unwrap();
    assert_eq!(file_info.total_rows, 4);
}
