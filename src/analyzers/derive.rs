use tracing::debug;

use crate::analyzers::normalize::{NormalizedRow, normalize};
use crate::analyzers::types::{AugmentedRow, AugmentedTable, Columns};
use crate::config::{DeriveConfig, LsAttachment};
use crate::errors::DeriveError;
use crate::stats::FeederStats;
use crate::table::SheetTable;

/// Derives per-row metrics for a sheet.
///
/// Rows come back in input order. Unparsable cells count as zero and never
/// fail the call.
///
/// # Errors
///
/// [`DeriveError::InvalidConfig`] for an unusable configuration and
/// [`DeriveError::MissingColumns`] when a required column is absent.
pub fn derive(table: &SheetTable, config: &DeriveConfig) -> Result<AugmentedTable, DeriveError> {
    config.validate()?;
    let normalized = normalize(table, config)?;

    if !normalized.zero_filled.is_empty() {
        debug!(
            sheet = %normalized.sheet,
            columns = ?normalized.zero_filled,
            "Slot columns absent, treating as zero"
        );
    }

    let headers = normalized.headers;
    let rows: Vec<AugmentedRow> = normalized
        .rows
        .into_iter()
        .map(|row| augment(row, &headers, config.ls_attachment))
        .collect();

    debug!(sheet = %normalized.sheet, rows = rows.len(), "Metrics derived");

    Ok(AugmentedTable {
        sheet: normalized.sheet,
        headers,
        rows,
    })
}

fn augment(row: NormalizedRow, headers: &[String], attachment: LsAttachment) -> AugmentedRow {
    let stats = FeederStats::from_slots(&row.slots);

    let ls_hours = match attachment {
        LsAttachment::NonSlotMarker => row.marker_outside_slots.then_some(stats.marker_slots),
        LsAttachment::AnySlotMarker => (stats.marker_slots > 0).then_some(stats.marker_slots),
        LsAttachment::Always => Some(stats.marker_slots),
    };

    AugmentedRow {
        feeder: feeder_label(&row.feeder_id, &row.load_center),
        band: row.band,
        columns: Columns::new(headers, row.cells),
        stats,
        ls_hours,
    }
}

pub fn feeder_label(feeder_id: &str, load_center: &str) -> String {
    format!("{feeder_id} ({load_center})")
}
