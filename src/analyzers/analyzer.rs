use anyhow::Result;
use tracing::{info, warn};

use crate::analyzers::aggregate::{collect_totals, sheet_total, summarize};
use crate::analyzers::derive::derive;
use crate::analyzers::types::{SheetSummary, SheetTotals};
use crate::config::DeriveConfig;
use crate::services::sheet_source::SheetSource;

/// Fetches one sheet, derives its metrics and builds the dashboard summary.
#[tracing::instrument(skip(source, config))]
pub async fn analyze_sheet<S: SheetSource + ?Sized>(
    source: &S,
    sheet: &str,
    config: &DeriveConfig,
) -> Result<SheetSummary> {
    let table = source.fetch_sheet(sheet).await?;
    let derived = derive(&table, config)?;
    let summary = summarize(derived, config);

    if summary.ls_feeders.is_empty() {
        info!("No feeders with LS found");
    }

    info!(
        rows = summary.row_count,
        total_load = summary.total_load,
        ls_feeders = summary.ls_feeders.len(),
        "Sheet summarized"
    );

    Ok(summary)
}

/// Totals every sheet of the source, pausing the source's request delay
/// between fetches.
#[tracing::instrument(skip(source, config))]
pub async fn sheet_totals_from<S: SheetSource + ?Sized>(
    source: &S,
    config: &DeriveConfig,
) -> Result<SheetTotals> {
    let names = source.list_sheets().await?;
    if names.is_empty() {
        warn!("Source has no sheets");
    }

    let delay = source.request_delay();
    let mut sheets = Vec::with_capacity(names.len());

    for (i, name) in names.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let table = source.fetch_sheet(name).await?;
        let total = sheet_total(&table, config)?;
        info!(sheet = %total.sheet, total_load = total.total_load, "Sheet totalled");
        sheets.push(total);
    }

    let totals = collect_totals(sheets);
    info!(
        sheets = totals.sheets.len(),
        grand_total = totals.grand_total,
        "Sum of all sheet totals"
    );

    Ok(totals)
}
