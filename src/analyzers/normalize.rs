//! Schema normalization: resolves required columns, zero-fills absent slot
//! columns and classifies every slot cell.

use tracing::debug;

use crate::config::DeriveConfig;
use crate::errors::DeriveError;
use crate::table::{CellValue, SheetTable};

/// A sheet whose slots are aligned to the configured schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub sheet: String,
    pub headers: Vec<String>,
    pub rows: Vec<NormalizedRow>,
    /// Slot labels with no column in the sheet; their cells are `Missing`.
    pub zero_filled: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    /// Original cells, in header order.
    pub cells: Vec<String>,
    pub feeder_id: String,
    pub load_center: String,
    pub band: String,
    /// One entry per configured slot label, in schedule order.
    pub slots: Vec<CellValue>,
    /// The marker appears in a column that is not a slot column.
    pub marker_outside_slots: bool,
}

/// Slot cells only, for sheets that are totalled without being derived.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotTable {
    pub sheet: String,
    pub rows: Vec<Vec<CellValue>>,
    pub zero_filled: Vec<String>,
}

/// Normalizes a sheet for metric derivation.
///
/// # Errors
///
/// [`DeriveError::MissingColumns`] listing every required column that is
/// absent from the header. Absent slot columns are not an error.
pub fn normalize(table: &SheetTable, config: &DeriveConfig) -> Result<NormalizedTable, DeriveError> {
    let mut missing = Vec::new();
    let mut required = Vec::with_capacity(3);
    for column in config.required_columns() {
        match table.column_index(column) {
            Some(idx) => required.push(idx),
            None => missing.push(column.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(DeriveError::MissingColumns {
            sheet: table.name.clone(),
            missing,
        });
    }

    let (feeder_idx, load_center_idx, band_idx) = (required[0], required[1], required[2]);
    let slot_indices = slot_indices(table, config);
    let zero_filled = zero_filled(&slot_indices, config);

    let rows = table
        .rows
        .iter()
        .map(|cells| {
            let marker_outside_slots = cells.iter().enumerate().any(|(idx, cell)| {
                cell == &config.ls_marker && !slot_indices.contains(&Some(idx))
            });

            NormalizedRow {
                feeder_id: cells[feeder_idx].clone(),
                load_center: cells[load_center_idx].clone(),
                band: cells[band_idx].clone(),
                slots: classify_slots(cells, &slot_indices, &config.ls_marker),
                marker_outside_slots,
                cells: cells.clone(),
            }
        })
        .collect();

    debug!(
        sheet = %table.name,
        rows = table.rows.len(),
        zero_filled = zero_filled.len(),
        "Sheet normalized"
    );

    Ok(NormalizedTable {
        sheet: table.name.clone(),
        headers: table.headers.clone(),
        rows,
        zero_filled,
    })
}

/// Aligns slot cells to the schedule without checking required columns.
pub fn normalize_slots(table: &SheetTable, config: &DeriveConfig) -> SlotTable {
    let slot_indices = slot_indices(table, config);
    let zero_filled = zero_filled(&slot_indices, config);

    let rows = table
        .rows
        .iter()
        .map(|cells| classify_slots(cells, &slot_indices, &config.ls_marker))
        .collect();

    SlotTable {
        sheet: table.name.clone(),
        rows,
        zero_filled,
    }
}

fn slot_indices(table: &SheetTable, config: &DeriveConfig) -> Vec<Option<usize>> {
    config
        .slot_labels
        .iter()
        .map(|label| table.column_index(label))
        .collect()
}

fn zero_filled(slot_indices: &[Option<usize>], config: &DeriveConfig) -> Vec<String> {
    slot_indices
        .iter()
        .zip(&config.slot_labels)
        .filter(|(idx, _)| idx.is_none())
        .map(|(_, label)| label.clone())
        .collect()
}

fn classify_slots(cells: &[String], slot_indices: &[Option<usize>], marker: &str) -> Vec<CellValue> {
    slot_indices
        .iter()
        .map(|idx| match idx {
            Some(i) => CellValue::from_raw(&cells[*i], marker),
            None => CellValue::Missing,
        })
        .collect()
}
