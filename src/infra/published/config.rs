use anyhow::{Context, Result};
use serde::Deserialize;

/// A sheet name and the URL its contents are exported at.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SheetUrl {
    pub name: String,
    pub url: String,
}

/// Maps sheet names to export URLs.
///
/// Stored as a JSON array on disk so workbook order survives:
/// ```json
/// [
///   { "name": "Day 1", "url": "https://docs.google.com/spreadsheets/d/<id>/export?format=csv&gid=0" },
///   { "name": "Day 2", "url": "https://docs.google.com/spreadsheets/d/<id>/export?format=csv&gid=1" }
/// ]
/// ```
#[derive(Debug, Clone, Default)]
pub struct SheetUrlConfig {
    entries: Vec<SheetUrl>,
}

impl SheetUrlConfig {
    pub fn new(entries: Vec<SheetUrl>) -> Self {
        Self { entries }
    }

    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sheet URL config '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("Failed to parse sheet URL config '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let entries: Vec<SheetUrl> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    /// Returns the export URL for `sheet`, if one is configured.
    pub fn get_url(&self, sheet: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == sheet)
            .map(|e| e.url.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}
