//! Parsers turning fetched sheet bytes into a [`SheetTable`].

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::debug;

use crate::table::SheetTable;

/// Decodes a CSV export (header row first) into a [`SheetTable`].
///
/// Records may be shorter or longer than the header; they are padded or
/// truncated to its width.
///
/// # Errors
///
/// Returns an error if the bytes are not readable CSV.
pub fn parse_csv(name: &str, bytes: &[u8]) -> Result<SheetTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("Failed to read CSV header of sheet '{name}'"))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.with_context(|| format!("Malformed CSV record in sheet '{name}'"))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(SheetTable::new(name, headers, rows))
}

/// Decodes a JSON array of row objects, the shape returned by a spreadsheet
/// "get all records" call.
///
/// Headers are collected in first-seen order. Numbers keep their decimal
/// text, `null` becomes a blank cell, and keys absent from a row are blank.
pub fn parse_json_records(name: &str, bytes: &[u8]) -> Result<SheetTable> {
    let value: Value = serde_json::from_slice(bytes)
        .with_context(|| format!("Failed to parse JSON records of sheet '{name}'"))?;

    let Value::Array(items) = value else {
        bail!("Sheet '{name}': expected a JSON array of records");
    };

    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(map) = item else {
            bail!("Sheet '{name}': every record must be a JSON object");
        };
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(map);
    }

    let rows = objects
        .iter()
        .map(|map| {
            headers
                .iter()
                .map(|h| map.get(h).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(SheetTable::new(name, headers, rows))
}

/// Parses sheet bytes as JSON records when the payload looks like a JSON
/// array, and as CSV otherwise or when the JSON decode fails.
pub fn parse_sheet(name: &str, bytes: &[u8]) -> Result<SheetTable> {
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
    if first == Some(&b'[') {
        match parse_json_records(name, bytes) {
            Ok(table) => return Ok(table),
            Err(e) => debug!(sheet = name, error = %e, "Not JSON records, reading as CSV"),
        }
    }
    parse_csv(name, bytes)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
