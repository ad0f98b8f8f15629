use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::parser::parse_sheet;
use crate::services::sheet_source::SheetSource;
use crate::table::SheetTable;

const EXTENSIONS: [&str; 2] = ["csv", "json"];

/// A workbook stored as a directory with one `<sheet>.csv` (or `.json`)
/// file per sheet. Sheets are listed in file-name order.
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn sheet_path(&self, name: &str) -> Option<PathBuf> {
        EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{name}.{ext}")))
            .find(|path| path.is_file())
    }
}

fn is_sheet_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| EXTENSIONS.contains(&e))
}

#[async_trait]
impl SheetSource for CsvDirSource {
    async fn list_sheets(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read sheet directory {}", self.dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            if !is_sheet_file(&path) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !names.iter().any(|n| n == stem) {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    async fn fetch_sheet(&self, name: &str) -> Result<SheetTable> {
        let Some(path) = self.sheet_path(name) else {
            bail!("Sheet '{name}' not found in {}", self.dir.display());
        };

        debug!(path = %path.display(), "Reading sheet file");
        let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        parse_sheet(name, &bytes)
    }
}
