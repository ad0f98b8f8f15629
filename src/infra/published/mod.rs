//! Sheets published from a hosted spreadsheet as CSV (or JSON) exports.
//!
//! [`SheetUrlConfig`] lists the export URL of each sheet, in workbook order.
//! [`PublishedSheetsClient`] fetches them through an [`HttpClient`](crate::fetch::HttpClient).

mod client;
mod config;

pub use client::PublishedSheetsClient;
pub use config::{SheetUrl, SheetUrlConfig};
