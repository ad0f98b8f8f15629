//! Derive configuration: slot schedule, band taxonomy and column names.
//!
//! Stored as a JSON object on disk; every key is optional:
//! ```json
//! {
//!   "bands": ["A", "B", "C", "D", "E"],
//!   "ls_marker": "LS",
//!   "feeder_column": "33/11KV FEEDER",
//!   "top_n": 10,
//!   "ls_attachment": "non_slot_marker"
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::DeriveError;

/// Decides which rows receive an `LS_Hours` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LsAttachment {
    /// A row qualifies only when the marker appears outside the slot columns,
    /// which is how the feeder dashboard has always filtered (slot cells are
    /// coerced to numbers before the marker test).
    #[default]
    NonSlotMarker,
    /// A row qualifies when at least one slot cell holds the marker.
    AnySlotMarker,
    /// Every row gets an `LS_Hours` value, zero included.
    Always,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriveConfig {
    pub slot_labels: Vec<String>,
    pub bands: Vec<String>,
    pub ls_marker: String,
    pub feeder_column: String,
    pub load_center_column: String,
    pub band_column: String,
    pub top_n: usize,
    pub ls_attachment: LsAttachment,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            slot_labels: half_hourly_slots(),
            bands: ["A", "B", "C", "D", "E"].map(String::from).to_vec(),
            ls_marker: "LS".to_string(),
            feeder_column: "33/11KV FEEDER".to_string(),
            load_center_column: "LOAD CENTER".to_string(),
            band_column: "BAND".to_string(),
            top_n: 10,
            ls_attachment: LsAttachment::default(),
        }
    }
}

impl DeriveConfig {
    /// Loads the config from a JSON file at `path`, filling absent keys with defaults.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read derive config '{path}'"))?;
        let config: DeriveConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse derive config '{path}'"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DeriveError> {
        if self.slot_labels.is_empty() {
            return Err(DeriveError::InvalidConfig("slot_labels is empty".into()));
        }

        let mut seen = HashSet::new();
        for label in &self.slot_labels {
            if !seen.insert(label.as_str()) {
                return Err(DeriveError::InvalidConfig(format!(
                    "duplicate slot label '{label}'"
                )));
            }
        }

        if self.bands.is_empty() {
            return Err(DeriveError::InvalidConfig("bands is empty".into()));
        }

        let mut seen = HashSet::new();
        for band in &self.bands {
            if !seen.insert(band.as_str()) {
                return Err(DeriveError::InvalidConfig(format!("duplicate band '{band}'")));
            }
        }

        if self.ls_marker.is_empty() {
            return Err(DeriveError::InvalidConfig("ls_marker is empty".into()));
        }

        Ok(())
    }

    /// Names of the columns every derived sheet must carry.
    pub fn required_columns(&self) -> [&str; 3] {
        [
            self.feeder_column.as_str(),
            self.load_center_column.as_str(),
            self.band_column.as_str(),
        ]
    }
}

/// The 48 half-hour labels of a reporting day, `0:00` through `23:30`.
pub fn half_hourly_slots() -> Vec<String> {
    (0..24)
        .flat_map(|hour| [format!("{hour}:00"), format!("{hour}:30")])
        .collect()
}
