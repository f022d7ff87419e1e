//! Data sources, caching and timeframe resampling.

pub mod cache;
pub mod csv_import;
pub mod provider;
pub mod resample;
pub mod synthetic;
pub mod yahoo;

pub use cache::{CacheMeta, CoverageResult, ParquetCache};
pub use csv_import::CsvProvider;
pub use provider::{filter_range, DataError, DataProvider, DataSource, FetchResult, RawBar};
pub use resample::{to_monthly, to_weekly};
pub use synthetic::{generate_synthetic_bars, SyntheticProvider};
pub use yahoo::YahooProvider;

use chrono::NaiveDate;

/// Parse a calendar date written `YYYY-MM-DD` or `YYYYMMDD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
        .ok()
}
