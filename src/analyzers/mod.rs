//! Feeder metric derivation and dashboard aggregation.
//!
//! Sheets are normalized against the configured slot schedule, every row
//! gets its supply metrics, and the rows are then rolled up by band, ranked
//! by load and totalled per sheet.

pub mod aggregate;
pub mod analyzer;
pub mod derive;
pub mod normalize;
pub mod types;
