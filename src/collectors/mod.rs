pub mod current;
pub mod historical;

pub use current::CurrentCollector;
pub use historical::{HistoricalCollector, LocationRecords};
