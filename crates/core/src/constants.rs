/// Symbols ingested when no explicit list is configured
pub const DEFAULT_SYMBOLS: &[&str] = &["IBM", "AAPL"];

/// Length of the trailing ingestion window, in days, ending today
pub const TRAILING_WINDOW_DAYS: i64 = 14;

/// Default page size for the record listing
pub const DEFAULT_PAGE_LIMIT: i64 = 5;

/// Default page for the record listing
pub const DEFAULT_PAGE: i64 = 1;

/// Canonical calendar date format, used on the wire and in storage
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reported when a statistics query matches no rows
pub const NO_DATA_FOUND_MESSAGE: &str = "No data found for given parameters.";
