//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, CSV files,
//! synthetic walks) so the loader can swap implementations and tests can run
//! without a network.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Bar;

/// Daily OHLCV bar as delivered by a provider, before cleaning/validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl From<RawBar> for Bar {
    fn from(raw: RawBar) -> Self {
        Bar {
            date: raw.date,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
            volume: raw.volume,
        }
    }
}

impl From<&Bar> for RawBar {
    fn from(bar: &Bar) -> Self {
        RawBar {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("cache error: {0}")]
    CacheError(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("parquet I/O error: {0}")]
    ParquetError(String),

    #[error("no cached data for symbol '{symbol}'; run `download {symbol}` first")]
    NoCachedData { symbol: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful data fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<RawBar>,
    pub source: DataSource,
}

impl FetchResult {
    pub fn into_bars(self) -> Vec<Bar> {
        self.bars.into_iter().map(Bar::from).collect()
    }
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Cache,
    Synthetic,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::YahooFinance => "yahoo_finance",
            Self::CsvImport => "csv_import",
            Self::Cache => "cache",
            Self::Synthetic => "synthetic",
        };
        f.write_str(s)
    }
}

/// Trait for data providers (Yahoo Finance, CSV import, etc).
///
/// The cache layer sits above this trait; providers don't know about the cache.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a symbol over an inclusive date range.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;

    /// Whether the provider can currently serve requests.
    fn is_available(&self) -> bool;
}

/// Keep only bars dated within `[start, end]`.
pub fn filter_range(bars: Vec<RawBar>, start: NaiveDate, end: NaiveDate) -> Vec<RawBar> {
    bars.into_iter()
        .filter(|b| b.date >= start && b.date <= end)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(day: u32) -> RawBar {
        RawBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 10.0,
        }
    }

    #[test]
    fn raw_bar_converts_to_bar() {
        let bar: Bar = raw(2).into();
        assert_eq!(bar.close, 1.5);
        assert_eq!(RawBar::from(&bar), raw(2));
    }

    #[test]
    fn filter_range_is_inclusive() {
        let bars = vec![raw(1), raw(2), raw(3), raw(4)];
        let kept = filter_range(
            bars,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        );
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].date.to_string(), "2024-01-02");
    }

    #[test]
    fn provider_is_object_safe() {
        fn _takes_dyn(_: &dyn DataProvider) {}
    }

    #[test]
    fn data_source_display() {
        assert_eq!(DataSource::YahooFinance.to_string(), "yahoo_finance");
        assert_eq!(DataSource::Synthetic.to_string(), "synthetic");
    }
}
