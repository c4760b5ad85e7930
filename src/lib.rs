pub mod archive;
pub mod cli;
pub mod collectors;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod transport;
pub mod utils;

pub use collectors::{CurrentCollector, HistoricalCollector};
pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
