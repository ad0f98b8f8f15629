use chrono::Utc;
use std::collections::{BTreeMap, HashMap};

use crate::analyzers::normalize::normalize_slots;
use crate::analyzers::types::{
    AugmentedRow, AugmentedTable, BandBreakdown, BandSummary, SheetSummary, SheetTotal,
    SheetTotals,
};
use crate::config::DeriveConfig;
use crate::errors::DeriveError;
use crate::table::SheetTable;

/// Sum of `TOTAL_LOAD` over all rows.
pub fn total_load(rows: &[AugmentedRow]) -> f64 {
    rows.iter().map(AugmentedRow::total_load).sum()
}

/// Groups rows by band, summing load and counting feeders.
///
/// Every configured band is reported, zero when absent. Bands found in the
/// data but not configured land in [`BandBreakdown::other`], so the totals
/// across the whole breakdown always match the sheet totals.
pub fn band_breakdown(rows: &[AugmentedRow], bands: &[String]) -> BandBreakdown {
    let mut groups: HashMap<&str, (f64, usize)> = HashMap::new();

    for row in rows {
        let entry = groups.entry(row.band.as_str()).or_default();
        entry.0 += row.total_load();
        entry.1 += 1;
    }

    let configured = bands
        .iter()
        .map(|band| {
            let (total_load, feeder_count) = groups.get(band.as_str()).copied().unwrap_or_default();
            BandSummary {
                band: band.clone(),
                total_load,
                feeder_count,
            }
        })
        .collect();

    let other: BTreeMap<&str, (f64, usize)> = groups
        .into_iter()
        .filter(|(band, _)| !bands.iter().any(|b| b == band))
        .collect();

    BandBreakdown {
        bands: configured,
        other: other
            .into_iter()
            .map(|(band, (total_load, feeder_count))| BandSummary {
                band: band.to_string(),
                total_load,
                feeder_count,
            })
            .collect(),
    }
}

/// The `n` rows with the highest `TOTAL_LOAD`, ties kept in input order.
pub fn top_feeders(rows: &[AugmentedRow], n: usize) -> Vec<AugmentedRow> {
    let mut ranked: Vec<&AugmentedRow> = rows.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.total_load().total_cmp(&a.total_load()));
    ranked.into_iter().take(n).cloned().collect()
}

/// Rows that carry an `LS_Hours` value.
pub fn ls_feeders(rows: &[AugmentedRow]) -> Vec<AugmentedRow> {
    rows.iter().filter(|r| r.ls_hours.is_some()).cloned().collect()
}

/// Builds the dashboard summary for a derived sheet.
pub fn summarize(table: AugmentedTable, config: &DeriveConfig) -> SheetSummary {
    SheetSummary {
        generated_at: Utc::now(),
        sheet: table.sheet.clone(),
        row_count: table.rows.len(),
        total_load: total_load(&table.rows),
        bands: band_breakdown(&table.rows, &config.bands),
        top_feeders: top_feeders(&table.rows, config.top_n),
        ls_feeders: ls_feeders(&table.rows),
        table,
    }
}

/// Sum of every slot reading in a sheet.
///
/// Only slot columns are consulted, so sheets lacking the feeder columns
/// still total.
pub fn sheet_total(table: &SheetTable, config: &DeriveConfig) -> Result<SheetTotal, DeriveError> {
    config.validate()?;
    let slots = normalize_slots(table, config);

    let total_load = slots
        .rows
        .iter()
        .flat_map(|row| row.iter().map(|cell| cell.load()))
        .sum();

    Ok(SheetTotal {
        sheet: slots.sheet,
        total_load,
    })
}

pub fn sheet_totals(tables: &[SheetTable], config: &DeriveConfig) -> Result<SheetTotals, DeriveError> {
    let sheets = tables
        .iter()
        .map(|t| sheet_total(t, config))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(collect_totals(sheets))
}

/// Sums already computed per-sheet totals.
pub fn collect_totals(sheets: Vec<SheetTotal>) -> SheetTotals {
    let grand_total = sheets.iter().map(|s| s.total_load).sum();
    SheetTotals {
        sheets,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::Columns;
    use crate::stats::FeederStats;

    fn row(feeder: &str, band: &str, total_load: f64) -> AugmentedRow {
        AugmentedRow {
            columns: Columns::default(),
            feeder: feeder.to_string(),
            band: band.to_string(),
            stats: FeederStats {
                total_load,
                ..Default::default()
            },
            ls_hours: None,
        }
    }

    fn bands() -> Vec<String> {
        DeriveConfig::default().bands
    }

    #[test]
    fn test_band_breakdown_zero_fills() {
        let rows = vec![row("F1", "A", 10.0), row("F2", "A", 5.0), row("F3", "C", 2.0)];
        let breakdown = band_breakdown(&rows, &bands());

        assert_eq!(breakdown.bands.len(), 5);
        assert_eq!(breakdown.get("A").unwrap().total_load, 15.0);
        assert_eq!(breakdown.get("A").unwrap().feeder_count, 2);
        assert_eq!(breakdown.get("B").unwrap().total_load, 0.0);
        assert_eq!(breakdown.get("B").unwrap().feeder_count, 0);
        assert_eq!(breakdown.get("E").unwrap().feeder_count, 0);
        assert!(breakdown.other.is_empty());
    }

    #[test]
    fn test_band_breakdown_keeps_unconfigured_bands() {
        let rows = vec![
            row("F1", "A", 10.0),
            row("F2", "", 1.0),
            row("F3", "Z", 4.0),
            row("F4", "Z", 4.0),
        ];
        let breakdown = band_breakdown(&rows, &bands());

        let other: Vec<_> = breakdown.other.iter().map(|b| b.band.as_str()).collect();
        assert_eq!(other, vec!["", "Z"]);
        assert_eq!(breakdown.get("Z").unwrap().feeder_count, 2);

        let load_sum: f64 = breakdown.iter().map(|b| b.total_load).sum();
        let count_sum: usize = breakdown.iter().map(|b| b.feeder_count).sum();
        assert_eq!(load_sum, total_load(&rows));
        assert_eq!(count_sum, rows.len());
    }

    #[test]
    fn test_band_order_follows_config() {
        let custom = vec!["E".to_string(), "A".to_string()];
        let breakdown = band_breakdown(&[row("F1", "A", 1.0)], &custom);
        let order: Vec<_> = breakdown.bands.iter().map(|b| b.band.as_str()).collect();

        assert_eq!(order, vec!["E", "A"]);
    }

    #[test]
    fn test_top_feeders_stable_on_ties() {
        let rows = vec![
            row("F1", "A", 5.0),
            row("F2", "A", 9.0),
            row("F3", "B", 5.0),
            row("F4", "B", 9.0),
            row("F5", "C", 1.0),
        ];
        let top = top_feeders(&rows, 4);
        let order: Vec<_> = top.iter().map(|r| r.feeder.as_str()).collect();

        assert_eq!(order, vec!["F2", "F4", "F1", "F3"]);
    }

    #[test]
    fn test_top_feeders_fewer_rows_than_n() {
        let rows = vec![row("F1", "A", 5.0), row("F2", "A", 7.0)];
        assert_eq!(top_feeders(&rows, 10).len(), 2);
        assert!(top_feeders(&[], 10).is_empty());
    }

    #[test]
    fn test_ls_feeders_empty_when_none() {
        let rows = vec![row("F1", "A", 5.0)];
        assert!(ls_feeders(&rows).is_empty());

        let mut flagged = row("F2", "B", 0.0);
        flagged.ls_hours = Some(3);
        let found = ls_feeders(&[rows[0].clone(), flagged]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].feeder, "F2");
    }

    #[test]
    fn test_sheet_total_sums_all_slots() {
        let config = DeriveConfig {
            slot_labels: vec!["0:00".into(), "0:30".into()],
            ..Default::default()
        };
        let table = SheetTable::new(
            "Day 1",
            vec!["0:00".into(), "NOTE".into()],
            vec![
                vec!["4".into(), "100".into()],
                vec!["LS".into(), "".into()],
                vec!["2.5".into(), "".into()],
            ],
        );

        let total = sheet_total(&table, &config).unwrap();
        assert_eq!(total.sheet, "Day 1");
        assert_eq!(total.total_load, 6.5);
    }

    #[test]
    fn test_grand_total_is_sum_of_sheets() {
        let config = DeriveConfig::default();
        let mk = |name: &str, value: &str| {
            SheetTable::new(name, vec!["0:00".into(), "12:30".into()], vec![vec![
                value.into(),
                value.into(),
            ]])
        };
        let tables = vec![mk("Mon", "1"), mk("Tue", "2.5"), mk("Wed", "LS")];

        let totals = sheet_totals(&tables, &config).unwrap();
        assert_eq!(totals.sheets.len(), 3);
        assert_eq!(totals.sheets[1].total_load, 5.0);
        assert_eq!(totals.grand_total, 7.0);
    }

    #[test]
    fn test_summarize() {
        let table = AugmentedTable {
            sheet: "Day 1".into(),
            headers: vec![],
            rows: vec![row("F1", "A", 10.0), row("F2", "B", 20.0)],
        };
        let summary = summarize(table, &DeriveConfig::default());

        assert_eq!(summary.row_count, 2);
        assert_eq!(summary.total_load, 30.0);
        assert_eq!(summary.top_feeders[0].feeder, "F2");
        assert!(summary.ls_feeders.is_empty());
    }
}
