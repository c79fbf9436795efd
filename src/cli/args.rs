use crate::models::MissingStrategy;
use crate::utils::constants::MAX_BATCH_SIZE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-etl")]
#[command(about = "Batch ETL for daily per-city weather observations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Settings file [default: weather-etl.toml if present]")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path [default: pipeline.log_file setting]")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Log to stdout only")]
    pub no_log_file: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract raw files and report the row count
    Extract {
        #[arg(short, long, help = "Directory of raw CSV/JSON files")]
        raw_dir: Option<PathBuf>,
    },

    /// Extract, transform and load into the database
    Run {
        #[arg(short, long, help = "Directory of raw CSV/JSON files")]
        raw_dir: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Missing-value strategy: drop, fill_zero or fill_mean"
        )]
        missing_strategy: Option<MissingStrategy>,

        #[arg(short, long, value_parser = parse_batch_size, help = "Rows per upsert statement (1-2000)")]
        batch_size: Option<usize>,

        #[arg(
            short,
            long,
            num_args = 0..=1,
            help = "Also write a Parquet snapshot [default: data/processed/weather-{YYMMDD}.parquet]"
        )]
        export: Option<Option<PathBuf>>,

        #[arg(long, default_value = "snappy")]
        compression: String,
    },

    /// Report database connectivity and row count
    Status,
}

fn parse_batch_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|e| format!("{}", e))?;
    if (1..=MAX_BATCH_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(format!("batch size must be between 1 and {}", MAX_BATCH_SIZE))
    }
}
