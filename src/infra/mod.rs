//! Concrete sheet sources.
//!
//! [`CsvDirSource`] reads one file per sheet from a local directory.
//! [`PublishedSheetsClient`] downloads published spreadsheet exports over HTTP.

mod csv_dir;
pub mod published;

pub use csv_dir::CsvDirSource;
pub use published::{PublishedSheetsClient, SheetUrlConfig};
