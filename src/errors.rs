//! Errors surfaced by the metric deriver.
//!
//! Malformed cell content never shows up here; it is coerced to zero during
//! normalization. Only structural problems with the sheet or the
//! configuration are reported.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeriveError {
    #[error("Sheet '{sheet}' is missing required columns: {missing:?}")]
    MissingColumns { sheet: String, missing: Vec<String> },
    #[error("Invalid derive configuration: {0}")]
    InvalidConfig(String),
}
