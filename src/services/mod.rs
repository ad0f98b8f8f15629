pub mod sheet_source;

pub use sheet_source::SheetSource;
