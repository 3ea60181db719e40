//! Output formatting and persistence for schedules and aircraft tables.
//!
//! Supports CSV and JSON dumps to any writer, CSV files (create or append),
//! and saving/loading raw provider records.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::schedule::RawFlightRecord;

/// Writes `rows` as CSV with a header line to `writer`.
pub fn write_csv_to<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `rows` as a pretty-printed JSON array to `writer`.
pub fn write_json_to<W: Write, T: Serialize>(mut writer: W, rows: &[T]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes `rows` to a fresh CSV file at `path`, replacing any existing file.
pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create '{path}'"))?;
    write_csv_to(BufWriter::new(file), rows)?;
    debug!(path, rows = rows.len(), "CSV written");
    Ok(())
}

/// Appends `rows` to the CSV file at `path`.
///
/// Creates the file with headers if it does not already exist.
pub fn append_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = rows.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Saves raw provider records as a JSON array, as delivered.
pub fn save_raw_records(path: &str, records: &[RawFlightRecord]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create '{path}'"))?;
    write_json_to(BufWriter::new(file), records)?;
    debug!(path, records = records.len(), "Raw records saved");
    Ok(())
}

/// Loads raw provider records previously written by [`save_raw_records`].
pub fn load_raw_records(path: &str) -> Result<Vec<RawFlightRecord>> {
    let file = File::open(path).with_context(|| format!("Failed to open '{path}'"))?;
    let records = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("'{path}' is not a JSON array of flight records"))?;
    Ok(records)
}
