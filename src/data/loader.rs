//! CSV loader for spot history.
//!
//! Reads the timestamp/spot rows the simulation driver consumes from a CSV
//! export. Fields go through the tolerant parsers in [`crate::data::parse`],
//! so NSE-style thousands separators and placeholder values are handled.
//!
//! Expected columns (case-insensitive): `timestamp`, `spot`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use super::parse::{clean_numeric, parse_timestamp};
use super::types::SpotBar;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Load spot history from a CSV file.
pub fn load_spot_history<P: AsRef<Path>>(path: P) -> Result<Vec<SpotBar>, LoaderError> {
    read_spot_history(File::open(path.as_ref())?)
}

/// Read spot history from any CSV source.
pub fn read_spot_history<R: Read>(source: R) -> Result<Vec<SpotBar>, LoaderError> {
    let mut reader = csv::Reader::from_reader(source);

    let headers = reader.headers()?.clone();
    let timestamp_idx = column_index(&headers, "timestamp")?;
    let spot_idx = column_index(&headers, "spot")?;

    let mut bars = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // CSV line number for error messages: header is line 1.
        let line = i + 2;

        let raw_timestamp = record.get(timestamp_idx).unwrap_or("");
        let timestamp = parse_timestamp(raw_timestamp).ok_or_else(|| {
            LoaderError::InvalidData(format!("line {line}: unparseable timestamp `{raw_timestamp}`"))
        })?;

        let raw_spot = record.get(spot_idx).unwrap_or("");
        let spot = clean_numeric(raw_spot).ok_or_else(|| {
            LoaderError::InvalidData(format!("line {line}: unparseable spot `{raw_spot}`"))
        })?;

        bars.push(SpotBar { timestamp, spot });
    }

    Ok(bars)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, LoaderError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| LoaderError::InvalidData(format!("missing `{name}` column")))
}
