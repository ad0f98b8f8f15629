//! Data types produced by the derivation and aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::stats::FeederStats;

/// A row's original cells paired with their column names, in header order.
///
/// Serializes as a map from column name to cell text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns(Vec<(String, String)>);

impl Columns {
    pub fn new(headers: &[String], cells: Vec<String>) -> Self {
        Self(headers.iter().cloned().zip(cells).collect())
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, value)| value.as_str())
    }
}

impl Serialize for Columns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A sheet row with its derived metrics attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedRow {
    pub columns: Columns,
    /// Display label, `"<feeder id> (<load center>)"`.
    #[serde(rename = "FEEDER")]
    pub feeder: String,
    pub band: String,
    #[serde(flatten)]
    pub stats: FeederStats,
    #[serde(rename = "LS_Hours", skip_serializing_if = "Option::is_none")]
    pub ls_hours: Option<usize>,
}

impl AugmentedRow {
    pub fn total_load(&self) -> f64 {
        self.stats.total_load
    }
}

/// The derived sheet, rows in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedTable {
    pub sheet: String,
    pub headers: Vec<String>,
    pub rows: Vec<AugmentedRow>,
}

/// Load total and feeder count for one band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandSummary {
    pub band: String,
    pub total_load: f64,
    pub feeder_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandBreakdown {
    /// Configured bands in configured order; absent ones report zero.
    pub bands: Vec<BandSummary>,
    /// Bands present in the data but not configured, sorted by name.
    pub other: Vec<BandSummary>,
}

impl BandBreakdown {
    pub fn get(&self, band: &str) -> Option<&BandSummary> {
        self.bands
            .iter()
            .chain(&self.other)
            .find(|b| b.band == band)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BandSummary> {
        self.bands.iter().chain(&self.other)
    }
}

/// Everything the dashboard renders for one sheet.
#[derive(Debug, Clone, Serialize)]
pub struct SheetSummary {
    pub generated_at: DateTime<Utc>,
    pub sheet: String,
    pub row_count: usize,
    pub total_load: f64,
    pub bands: BandBreakdown,
    pub top_feeders: Vec<AugmentedRow>,
    pub ls_feeders: Vec<AugmentedRow>,
    pub table: AugmentedTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetTotal {
    pub sheet: String,
    pub total_load: f64,
}

/// Per-sheet totals and their sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetTotals {
    pub sheets: Vec<SheetTotal>,
    pub grand_total: f64,
}
