//! Output formatting and persistence for derived feeder metrics.
//!
//! Supports pretty-printing, JSON files, the augmented CSV table and CSV
//! append for sheet-total history.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::AugmentedTable;
use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Columns appended to the sheet's own columns in the augmented CSV.
pub const DERIVED_COLUMNS: [&str; 5] = ["SUPPLY_Hrs", "TOTAL_LOAD", "AVRG_LOAD", "FEEDER", "LS_Hours"];

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as pretty-printed JSON, replacing any existing file.
pub fn write_json(path: &str, value: &impl Serialize) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {path}"))?;
    serde_json::to_writer_pretty(file, value)?;
    debug!(path, "JSON written");
    Ok(())
}

/// Writes the derived sheet as CSV: the original columns followed by
/// [`DERIVED_COLUMNS`]. `LS_Hours` is blank for rows without a value.
pub fn write_augmented_csv(path: &str, table: &AugmentedTable) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {path}"))?;
    let mut writer = WriterBuilder::new().from_writer(file);

    let header = table
        .headers
        .iter()
        .map(String::as_str)
        .chain(DERIVED_COLUMNS);
    writer.write_record(header)?;

    for row in &table.rows {
        let derived = [
            row.stats.supply_hrs.to_string(),
            row.stats.total_load.to_string(),
            row.stats.avrg_load.to_string(),
            row.feeder.clone(),
            row.ls_hours.map(|h| h.to_string()).unwrap_or_default(),
        ];
        writer.write_record(row.columns.values().chain(derived.iter().map(String::as_str)))?;
    }

    writer.flush()?;
    debug!(path, rows = table.rows.len(), "Augmented CSV written");
    Ok(())
}

/// Appends a record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &impl Serialize) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}
