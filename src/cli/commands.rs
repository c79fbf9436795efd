use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::error::Result;
use crate::pipeline::{EtlPipeline, ExportOptions};
use crate::processors::Transformer;
use crate::readers::Extractor;
use crate::utils::constants::TABLE_NAME;
use crate::utils::filename::generate_default_export_filename;
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::writers::{ParquetWriter, WeatherStore};
use tracing::error;

pub async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    let log_file = if cli.no_log_file {
        None
    } else {
        Some(cli.log_file.unwrap_or_else(|| settings.pipeline.log_file.clone()))
    };
    init_logging(cli.verbose, log_file.as_deref())?;

    match cli.command {
        Commands::Extract { raw_dir } => {
            let raw_dir = raw_dir.unwrap_or_else(|| settings.pipeline.raw_dir.clone());
            let dataset = Extractor::new().extract_all(&raw_dir)?;
            println!("Extracted {} rows", dataset.len());
        }

        Commands::Run {
            raw_dir,
            missing_strategy,
            batch_size,
            export,
            compression,
        } => {
            let raw_dir = raw_dir.unwrap_or_else(|| settings.pipeline.raw_dir.clone());
            let missing_strategy = missing_strategy.unwrap_or(settings.pipeline.missing_strategy);
            let batch_size = batch_size.unwrap_or(settings.pipeline.batch_size);

            // Reject a bad codec before any work starts
            let parquet_writer = ParquetWriter::new().with_compression(&compression)?;
            let export = export.map(|path| ExportOptions {
                path: path.unwrap_or_else(|| {
                    generate_default_export_filename(&settings.pipeline.processed_dir)
                }),
                compression,
            });

            println!("Running ETL pipeline...");
            println!("Raw directory: {}", raw_dir.display());
            println!("Missing-value strategy: {}", missing_strategy);

            let store = WeatherStore::connect(&settings.database)?.with_batch_size(batch_size);
            let pipeline = EtlPipeline::new(&store)
                .with_transformer(Transformer::new().with_missing_strategy(missing_strategy))
                .with_export(export);

            let progress = ProgressReporter::new_spinner("Starting pipeline...", false);
            let outcome = pipeline.run(&raw_dir, Some(&progress)).await;
            progress.finish_and_clear();
            let summary = outcome?;

            if let Some(report) = &summary.report {
                println!("\n{}", report.summary());
            }

            if let Some(path) = &summary.exported_to {
                if path.exists() {
                    let file_info = parquet_writer.get_file_info(path)?;
                    println!("Exported to {}", path.display());
                    println!("{}\n", file_info.summary());
                }
            }

            match summary.total_rows {
                Some(total) => println!(
                    "Done! {} rows loaded. {} total in database.",
                    summary.records_loaded, total
                ),
                None => println!("No data extracted. Nothing loaded."),
            }

            store.close().await;
        }

        Commands::Status => println!("{}", status_line(&settings).await),
    }

    Ok(())
}

/// Connectivity report; connection and query failures become the message, not an error
async fn status_line(settings: &Settings) -> String {
    let store = match WeatherStore::connect(&settings.database) {
        Ok(store) => store,
        Err(e) => {
            error!("Status check failed: {}", e);
            return format!("Database error: {}", e);
        }
    };

    let line = match store.row_count().await {
        Ok(count) => format!("Database connected. {} rows in {}.", count, TABLE_NAME),
        Err(e) => {
            error!("Status check failed: {}", e);
            format!("Database error: {}", e)
        }
    };
    store.close().await;
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};
    use tempfile::TempDir;

    fn settings_with_url(url: &str) -> Settings {
        let toml = format!("[database]\nurl = \"{}\"\n", url);
        Settings::from_builder(
            Settings::default_builder()
                .unwrap()
                .add_source(File::from_str(&toml, FileFormat::Toml)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_status_reports_malformed_url() {
        let line = status_line(&settings_with_url("postgres://user@host:notaport/db")).await;
        assert!(line.starts_with("Database error:"), "{}", line);
    }

    #[tokio::test]
    async fn test_status_reports_row_count() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("weather.db").display());
        let settings = settings_with_url(&url);

        let store = WeatherStore::connect(&settings.database).unwrap();
        store.ensure_schema().await.unwrap();
        store.close().await;

        let line = status_line(&settings).await;
        assert_eq!(line, "Database connected. 0 rows in weather_data.");
    }
}
