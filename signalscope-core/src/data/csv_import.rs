//! CSV file provider.
//!
//! Reads `date,open,high,low,close,volume` files. Header aliases cover the
//! capitalised export format (`Date,Open,...`) and the exchange-feed format
//! (`trade_date,...,vol`). Dates are `YYYY-MM-DD` or `YYYYMMDD`.

use super::parse_date;
use super::provider::{filter_range, DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date", alias = "trade_date")]
    date: String,
    #[serde(alias = "Open")]
    open: Option<f64>,
    #[serde(alias = "High")]
    high: Option<f64>,
    #[serde(alias = "Low")]
    low: Option<f64>,
    #[serde(alias = "Close")]
    close: Option<f64>,
    #[serde(alias = "Volume", alias = "vol")]
    volume: Option<f64>,
}

/// Provider backed by a single CSV file.
///
/// The file is assumed to hold one symbol; the symbol passed to `fetch` only
/// labels the result.
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row of the file. Empty numeric cells become NaN.
    pub fn read_all(&self) -> Result<Vec<RawBar>, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut bars = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row?;
            let date = parse_date(&row.date).ok_or_else(|| {
                DataError::ValidationError(format!(
                    "{}: unparseable date '{}' on data row {}",
                    self.path.display(),
                    row.date,
                    line + 1
                ))
            })?;
            bars.push(RawBar {
                date,
                open: row.open.unwrap_or(f64::NAN),
                high: row.high.unwrap_or(f64::NAN),
                low: row.low.unwrap_or(f64::NAN),
                close: row.close.unwrap_or(f64::NAN),
                volume: row.volume.unwrap_or(f64::NAN),
            });
        }
        Ok(bars)
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars = filter_range(self.read_all()?, start, end);
        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        tracing::info!(%symbol, path = %self.path.display(), bars = bars.len(), "read csv file");
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }
}
