//! CLI entry point for the feeder metrics tool.
//!
//! Provides subcommands for summarizing one sheet of feeder readings,
//! totalling every sheet of a workbook, and listing the available sheets.

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use feeder_metrics::analyzers::analyzer::{analyze_sheet, sheet_totals_from};
use feeder_metrics::analyzers::types::SheetSummary;
use feeder_metrics::config::DeriveConfig;
use feeder_metrics::infra::{CsvDirSource, PublishedSheetsClient, SheetUrlConfig};
use feeder_metrics::output::{
    append_record, print_json, print_pretty, write_augmented_csv, write_json,
};
use feeder_metrics::services::SheetSource;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "feeder_metrics")]
#[command(about = "Derive load-supply metrics from feeder reading sheets", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// JSON file overriding the slot schedule, bands and column names
    #[arg(short, long, global = true, env = "FEEDER_METRICS_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Directory holding one CSV (or JSON) file per sheet
    #[arg(long, global = true, env = "FEEDER_SHEETS_DIR", conflicts_with = "urls")]
    dir: Option<String>,

    /// JSON file listing the published export URL of each sheet
    #[arg(long, global = true, env = "FEEDER_SHEETS_URLS")]
    urls: Option<String>,

    /// Seconds to wait between sheet downloads
    #[arg(long, global = true, default_value_t = 1)]
    request_delay: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive metrics for one sheet and report band totals and top feeders
    Summarize {
        /// Sheet name
        #[arg(value_name = "SHEET")]
        sheet: String,

        /// Write the full summary as JSON to this file
        #[arg(long)]
        json: Option<String>,

        /// Write the augmented table as CSV to this file
        #[arg(long)]
        csv: Option<String>,
    },
    /// Total every sheet and report the grand total
    Totals {
        /// CSV file to append per-sheet totals to
        #[arg(short, long)]
        output: Option<String>,

        /// Log the totals as pretty-printed JSON
        #[arg(long)]
        json: bool,
    },
    /// List the sheets of the source
    ListSheets,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/feeder_metrics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("feeder_metrics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DeriveConfig::load(path)?,
        None => DeriveConfig::default(),
    };
    let source = open_source(&cli.source)?;

    match cli.command {
        Commands::Summarize { sheet, json, csv } => {
            let summary = analyze_sheet(source.as_ref(), &sheet, &config).await?;
            report_summary(&summary);

            if let Some(path) = json {
                write_json(&path, &summary)?;
                info!(path = %path, "Summary written");
            }
            if let Some(path) = csv {
                write_augmented_csv(&path, &summary.table)?;
                info!(path = %path, "Augmented table written");
            }
        }
        Commands::Totals { output, json } => {
            let totals = sheet_totals_from(source.as_ref(), &config).await?;

            if json {
                print_json(&totals)?;
            }

            if let Some(path) = output {
                for total in &totals.sheets {
                    append_record(&path, total)?;
                }
                info!(path = %path, sheets = totals.sheets.len(), "Sheet totals appended");
            }
        }
        Commands::ListSheets => {
            let sheets = source.list_sheets().await?;
            info!(total = sheets.len(), "Sheet list fetched");

            for sheet in &sheets {
                info!(sheet = %sheet, "Sheet");
            }
        }
    }

    Ok(())
}

fn open_source(args: &SourceArgs) -> Result<Box<dyn SheetSource>> {
    match (&args.dir, &args.urls) {
        (Some(dir), _) => Ok(Box::new(CsvDirSource::new(dir))),
        (None, Some(urls)) => {
            let sheets = SheetUrlConfig::load(urls)?;
            let client = PublishedSheetsClient::new(sheets)?
                .with_delay(Duration::from_secs(args.request_delay));
            Ok(Box::new(client))
        }
        (None, None) => bail!("No sheet source given: pass --dir or --urls"),
    }
}

/// Logs the headline figures the dashboard shows for a sheet.
fn report_summary(summary: &SheetSummary) {
    info!(
        sheet = %summary.sheet,
        feeders = summary.row_count,
        total_load = summary.total_load,
        "Total load of all feeders"
    );

    for band in summary.bands.iter() {
        info!(
            band = %band.band,
            total_load = band.total_load,
            feeder_count = band.feeder_count,
            "Band"
        );
    }

    for (rank, row) in summary.top_feeders.iter().enumerate() {
        info!(
            rank = rank + 1,
            feeder = %row.feeder,
            total_load = row.stats.total_load,
            supply_hrs = row.stats.supply_hrs,
            "Top feeder"
        );
    }

    for row in &summary.ls_feeders {
        info!(feeder = %row.feeder, ls_hours = row.ls_hours, "LS feeder");
    }

    print_pretty(&summary.bands);
}
