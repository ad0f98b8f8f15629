//! Raw sheet tables and tagged cell values.

use serde::Serialize;

/// A single cell, classified against the configured outage marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CellValue {
    Numeric(f64),
    /// The load-shedding marker (`"LS"` by default).
    Marker,
    Text(String),
    Missing,
}

impl CellValue {
    /// Classifies a raw cell string.
    ///
    /// The marker comparison is exact (no trimming or case folding); numbers
    /// are parsed after trimming and must be finite.
    pub fn from_raw(raw: &str, marker: &str) -> Self {
        if raw == marker {
            return CellValue::Marker;
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Missing;
        }

        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => CellValue::Numeric(v),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    /// Numeric load carried by the cell. Anything that is not a number counts
    /// as zero, and negative readings are clamped to zero.
    pub fn load(&self) -> f64 {
        match self {
            CellValue::Numeric(v) if *v > 0.0 => *v,
            _ => 0.0,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, CellValue::Marker)
    }
}

/// One sheet as fetched from the data source: a header row plus string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    /// Each row has exactly `headers.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Builds a table, padding short rows with blanks and dropping cells
    /// beyond the header width.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_classification() {
        assert_eq!(CellValue::from_raw("12.5", "LS"), CellValue::Numeric(12.5));
        assert_eq!(CellValue::from_raw(" 7 ", "LS"), CellValue::Numeric(7.0));
        assert_eq!(CellValue::from_raw("LS", "LS"), CellValue::Marker);
        assert_eq!(CellValue::from_raw("", "LS"), CellValue::Missing);
        assert_eq!(CellValue::from_raw("   ", "LS"), CellValue::Missing);
        assert_eq!(
            CellValue::from_raw("n/a", "LS"),
            CellValue::Text("n/a".to_string())
        );
    }

    #[test]
    fn test_marker_is_exact_match() {
        assert_eq!(CellValue::from_raw("ls", "LS"), CellValue::Text("ls".into()));
        assert_eq!(CellValue::from_raw(" LS", "LS"), CellValue::Text(" LS".into()));
        assert_eq!(CellValue::from_raw("OFF", "OFF"), CellValue::Marker);
    }

    #[test]
    fn test_non_finite_numbers_are_text() {
        assert!(matches!(CellValue::from_raw("inf", "LS"), CellValue::Text(_)));
        assert!(matches!(CellValue::from_raw("NaN", "LS"), CellValue::Text(_)));
    }

    #[test]
    fn test_load_coercion() {
        assert_eq!(CellValue::Numeric(3.5).load(), 3.5);
        assert_eq!(CellValue::Numeric(-2.0).load(), 0.0);
        assert_eq!(CellValue::Marker.load(), 0.0);
        assert_eq!(CellValue::Text("x".into()).load(), 0.0);
        assert_eq!(CellValue::Missing.load(), 0.0);
    }

    #[test]
    fn test_new_pads_and_truncates_rows() {
        let table = SheetTable::new(
            "Day 1",
            vec!["a".into(), "b".into()],
            vec![vec!["1".into()], vec!["1".into(), "2".into(), "3".into()]],
        );
        assert_eq!(table.rows[0], vec!["1", ""]);
        assert_eq!(table.rows[1], vec!["1", "2"]);
        assert_eq!(table.column_index("b"), Some(1));
        assert_eq!(table.column_index("c"), None);
    }
}
