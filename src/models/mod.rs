pub mod record;
pub mod station;

pub use record::{HistoricalRecord, RawRecord};
pub use station::{canonical_name, station_code, Station, NAME_VARIANTS, STATIONS};
