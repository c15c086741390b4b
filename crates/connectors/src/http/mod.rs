pub mod fetcher;
pub mod query;

/// Date column the range filter applies to.
pub const DEFAULT_DATE_FIELD: &str = "closed_date";

/// Non-tabular field removed from every record before encoding.
pub const STRIPPED_FIELD: &str = "location";
