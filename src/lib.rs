pub mod analyzers;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod infra;
pub mod output;
pub mod parser;
pub mod services;
pub mod stats;
pub mod table;

pub use analyzers::derive::derive;
pub use config::DeriveConfig;
pub use errors::DeriveError;
