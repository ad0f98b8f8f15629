//! Trait for the spreadsheet-backed source the dashboard reads from.

use anyhow::Result;
use std::time::Duration;

use crate::table::SheetTable;

/// Abstraction over a workbook of feeder reading sheets (a CSV directory,
/// published spreadsheet exports, ...).
#[async_trait::async_trait]
pub trait SheetSource: Send + Sync {
    /// Returns the sheet names in workbook order.
    async fn list_sheets(&self) -> Result<Vec<String>>;

    /// Fetches the full contents of one sheet.
    async fn fetch_sheet(&self, name: &str) -> Result<SheetTable>;

    /// Pause to observe between consecutive fetches when walking every sheet.
    fn request_delay(&self) -> Duration {
        Duration::ZERO
    }
}
