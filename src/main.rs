//! CLI entry point for the flight schedule tool.
//!
//! Provides subcommands for fetching one direction of an airport's daily
//! schedule, fetching the merged day, and classifying aircraft types from
//! previously saved raw records.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use flight_schedule::{
    aircraft::AircraftClassifier,
    config::FetchConfig,
    infra::flightradar::FlightRadarSource,
    output::{load_raw_records, save_raw_records, write_csv, write_csv_to, write_json_to},
    schedule::{Direction, ScheduleFetcher, normalize, parse_window_start},
};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "flight_schedule")]
#[command(about = "Fetch airport schedules and classify aircraft types", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch arrivals or departures for an airport's day
    FetchSchedule {
        /// Airport ICAO code (e.g., "YSSY")
        airport: String,

        /// Which side of the schedule to fetch
        #[arg(value_enum)]
        direction: Direction,

        /// Window start as Unix seconds or RFC 3339 (defaults to now)
        #[arg(short, long)]
        window_start: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Write normalized flights to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Also save the raw provider records as JSON (input for classify-aircraft)
        #[arg(long)]
        raw_out: Option<String>,

        /// Write every raw page payload into this directory
        #[arg(long)]
        dump_dir: Option<String>,
    },
    /// Fetch departures and arrivals for an airport's day as one list
    DaySchedule {
        /// Airport ICAO code (e.g., "YSSY")
        airport: String,

        /// Window start as Unix seconds or RFC 3339 (defaults to now)
        #[arg(short, long)]
        window_start: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Write normalized flights to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Classify aircraft types found in saved raw records
    ClassifyAircraft {
        /// JSON file written by `fetch-schedule --raw-out`
        #[arg(value_name = "INPUT")]
        input: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Write the aircraft table to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing();
    let cli = Cli::parse();
    let config = FetchConfig::from_env();

    match cli.command {
        Commands::FetchSchedule {
            airport,
            direction,
            window_start,
            format,
            output,
            raw_out,
            dump_dir,
        } => {
            let window_start = resolve_window_start(window_start.as_deref())?;
            let mut source = FlightRadarSource::from_config(&config)?;
            if let Some(dir) = dump_dir {
                source = source.with_dump_dir(dir);
            }
            let fetcher = ScheduleFetcher::new(source, &config);

            let records = fetcher
                .fetch(&airport, direction, Some(window_start))
                .await?;
            if let Some(path) = raw_out {
                save_raw_records(&path, &records)?;
                info!(path = %path, records = records.len(), "Raw records saved");
            }

            let flights = normalize(&records, window_start, &airport)?;
            info!(%airport, %direction, flights = flights.len(), "Schedule normalized");
            emit(&flights, format, output.as_deref())?;
        }
        Commands::DaySchedule {
            airport,
            window_start,
            format,
            output,
        } => {
            let window_start = resolve_window_start(window_start.as_deref())?;
            let fetcher = ScheduleFetcher::new(FlightRadarSource::from_config(&config)?, &config);

            let flights = fetcher.fetch_day(&airport, Some(window_start)).await?;
            info!(%airport, flights = flights.len(), "Day schedule normalized");
            emit(&flights, format, output.as_deref())?;
        }
        Commands::ClassifyAircraft {
            input,
            format,
            output,
        } => {
            let classifier = AircraftClassifier::new()?;
            let records = load_raw_records(&input)?;
            let aircraft: Vec<_> = classifier.classify(&records)?.into_iter().collect();

            info!(records = records.len(), aircraft = aircraft.len(), "Aircraft classified");
            emit(&aircraft, format, output.as_deref())?;
        }
    }

    Ok(())
}

/// Colored stderr layer plus a JSON rolling log file.
///
/// The returned guard must be held until exit so buffered file logs flush.
fn init_tracing() -> WorkerGuard {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/flight_schedule.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("flight_schedule.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    file_guard
}

fn resolve_window_start(raw: Option<&str>) -> Result<DateTime<Utc>> {
    Ok(match raw {
        Some(raw) => parse_window_start(raw)?,
        None => Utc::now(),
    })
}

/// Writes rows to `output` as a file, or to stdout when no path is given.
fn emit<T: Serialize>(rows: &[T], format: Format, output: Option<&str>) -> Result<()> {
    match (format, output) {
        (Format::Csv, Some(path)) => write_csv(path, rows),
        (Format::Json, Some(path)) => write_json_to(std::fs::File::create(path)?, rows),
        (Format::Csv, None) => write_csv_to(std::io::stdout().lock(), rows),
        (Format::Json, None) => write_json_to(std::io::stdout().lock(), rows),
    }
}
