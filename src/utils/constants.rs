/// Service endpoints
pub const CURRENT_BASE_URL: &str = "https://danepubliczne.imgw.pl";
pub const CURRENT_STATION_PATH: &str = "api/data/synop/station";
pub const ARCHIVE_BASE_URL: &str =
    "https://dane.imgw.pl/data/dane_pomiarowo_obserwacyjne/dane_meteorologiczne/terminowe/synop";

/// Archive listing
pub const ARCHIVE_EXTENSION: &str = "zip";
pub const DEFAULT_YEAR: i32 = 2019;
pub const FULL_LISTING_YEAR: i32 = 2019;

/// Synop CSV column positions
pub const COL_STATION_CODE: usize = 0;
pub const COL_STATION_NAME: usize = 1;
pub const COL_YEAR: usize = 2;
pub const COL_MONTH: usize = 3;
pub const COL_DAY: usize = 4;
pub const COL_HOUR: usize = 5;
pub const MEASUREMENT_COLUMNS: [usize; 5] = [29, 25, 41, 37, 48];

/// Source columns kept from each row, in source order of selection
pub const SELECTED_COLUMNS: [usize; 10] = [1, 2, 3, 4, 5, 29, 25, 41, 37, 48];

/// Narrowest row that still holds every selected column
pub const MIN_ROW_WIDTH: usize = 49;

/// Processing defaults
pub const DEFAULT_DELIMITER: char = ',';
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const USER_AGENT: &str = concat!("imgw-collector/", env!("CARGO_PKG_VERSION"));

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "IMGW";
