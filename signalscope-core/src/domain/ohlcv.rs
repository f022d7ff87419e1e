//! OhlcvSeries: the validated, immutable input to every calculator.
//!
//! A series is ordered by strictly increasing date, holds only finite values,
//! and has at least `min_bars` bars. Construction is the only place these
//! invariants are checked; calculators borrow the bars and never mutate them.

use super::bar::Bar;
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;

/// Minimum number of bars required before a series may be analyzed.
pub const MIN_BARS: usize = 30;

/// Input validation failures for an OHLCV series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("series for '{symbol}' is empty")]
    Empty { symbol: String },

    #[error("insufficient history for '{symbol}': {got} bars, at least {required} required")]
    InsufficientBars {
        symbol: String,
        got: usize,
        required: usize,
    },

    #[error("non-finite {field} at bar {index}")]
    NonFinite { index: usize, field: &'static str },

    #[error("dates not strictly increasing at bar {index} ({date})")]
    NotIncreasing { index: usize, date: NaiveDate },
}

/// Outcome of cleaning a raw bar list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub input: usize,
    pub dropped_non_finite: usize,
    pub dropped_duplicates: usize,
    /// Kept bars whose OHLC values contradict each other (e.g. high < low).
    pub inconsistent: usize,
}

/// Clean raw bars: drop non-finite rows, sort ascending, drop duplicate dates.
///
/// The first occurrence of a duplicated date (in input order) is kept. Bars
/// failing the OHLC sanity check are kept but counted and logged.
pub fn clean_bars(bars: Vec<Bar>) -> (Vec<Bar>, CleanStats) {
    let mut stats = CleanStats {
        input: bars.len(),
        ..Default::default()
    };

    let mut finite: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        if bar.is_finite() {
            finite.push(bar);
        } else {
            stats.dropped_non_finite += 1;
        }
    }

    // Stable sort keeps input order among equal dates, so dedup keeps the first.
    finite.sort_by_key(|b| b.date);
    let mut seen = HashSet::with_capacity(finite.len());
    let before = finite.len();
    finite.retain(|b| seen.insert(b.date));
    stats.dropped_duplicates = before - finite.len();
    stats.inconsistent = finite.iter().filter(|b| !b.is_sane()).count();

    if stats.dropped_non_finite > 0 || stats.dropped_duplicates > 0 {
        tracing::warn!(
            input = stats.input,
            non_finite = stats.dropped_non_finite,
            duplicates = stats.dropped_duplicates,
            "dropped bars during cleaning"
        );
    }
    if stats.inconsistent > 0 {
        tracing::warn!(
            bars = stats.inconsistent,
            "bars with inconsistent OHLC values (kept)"
        );
    }

    (finite, stats)
}

/// A validated daily OHLCV series for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl OhlcvSeries {
    /// Validate `bars` as-is (no cleaning) and wrap them.
    pub fn new(
        symbol: impl Into<String>,
        bars: Vec<Bar>,
        min_bars: usize,
    ) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(SeriesError::Empty { symbol });
        }
        if bars.len() < min_bars {
            return Err(SeriesError::InsufficientBars {
                symbol,
                got: bars.len(),
                required: min_bars,
            });
        }
        for (index, bar) in bars.iter().enumerate() {
            if let Some(field) = bar.first_non_finite_field() {
                return Err(SeriesError::NonFinite { index, field });
            }
            if index > 0 && bar.date <= bars[index - 1].date {
                return Err(SeriesError::NotIncreasing {
                    index,
                    date: bar.date,
                });
            }
        }
        Ok(Self { symbol, bars })
    }

    /// Clean then validate.
    pub fn from_raw(
        symbol: impl Into<String>,
        bars: Vec<Bar>,
        min_bars: usize,
    ) -> Result<Self, SeriesError> {
        let (cleaned, _) = clean_bars(bars);
        Self::new(symbol, cleaned, min_bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }

    pub fn last_close(&self) -> f64 {
        self.bars[self.bars.len() - 1].close
    }

    /// Deterministic BLAKE3 fingerprint over symbol, dates and OHLCV values.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.symbol.as_bytes());
        for bar in &self.bars {
            hasher.update(bar.date.to_string().as_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn accepts_valid_series() {
        let series = OhlcvSeries::new("TEST", make_bars(&closes(40)), MIN_BARS).unwrap();
        assert_eq!(series.len(), 40);
        assert_eq!(series.symbol(), "TEST");
        assert_eq!(series.last_close(), 139.0);
    }

    #[test]
    fn rejects_short_series() {
        let err = OhlcvSeries::new("TEST", make_bars(&closes(29)), MIN_BARS).unwrap_err();
        assert_eq!(
            err,
            SeriesError::InsufficientBars {
                symbol: "TEST".into(),
                got: 29,
                required: 30
            }
        );
    }

    #[test]
    fn rejects_empty_series() {
        let err = OhlcvSeries::new("TEST", Vec::new(), MIN_BARS).unwrap_err();
        assert!(matches!(err, SeriesError::Empty { .. }));
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut bars = make_bars(&closes(35));
        bars[7].close = f64::NAN;
        let err = OhlcvSeries::new("TEST", bars, MIN_BARS).unwrap_err();
        assert_eq!(
            err,
            SeriesError::NonFinite {
                index: 7,
                field: "close"
            }
        );
    }

    #[test]
    fn rejects_unordered_dates() {
        let mut bars = make_bars(&closes(35));
        bars.swap(3, 4);
        let err = OhlcvSeries::new("TEST", bars, MIN_BARS).unwrap_err();
        assert!(matches!(err, SeriesError::NotIncreasing { index: 4, .. }));
    }

    #[test]
    fn clean_drops_nan_duplicates_and_sorts() {
        let mut bars = make_bars(&closes(5));
        bars[1].high = f64::INFINITY;
        let mut dup = bars[3].clone();
        dup.close = 999.0;
        bars.push(dup);
        bars.reverse();

        let (cleaned, stats) = clean_bars(bars);
        assert_eq!(stats.input, 6);
        assert_eq!(stats.dropped_non_finite, 1);
        assert_eq!(stats.dropped_duplicates, 1);
        assert_eq!(cleaned.len(), 4);
        assert!(cleaned.windows(2).all(|w| w[0].date < w[1].date));
        // Reversed input puts the 999.0 duplicate first, so it is the one kept.
        assert_eq!(cleaned[2].close, 999.0);
    }

    #[test]
    fn clean_counts_inconsistent_bars_without_dropping() {
        let mut bars = make_bars(&closes(5));
        bars[2].high = bars[2].low - 1.0;
        let (cleaned, stats) = clean_bars(bars);
        assert_eq!(cleaned.len(), 5);
        assert_eq!(stats.inconsistent, 1);
        assert_eq!(stats.dropped_non_finite, 0);
    }

    #[test]
    fn from_raw_cleans_before_validating() {
        let mut bars = make_bars(&closes(32));
        bars[0].open = f64::NAN;
        bars.reverse();
        let series = OhlcvSeries::from_raw("TEST", bars, MIN_BARS).unwrap();
        assert_eq!(series.len(), 31);
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let a = OhlcvSeries::new("TEST", make_bars(&closes(30)), MIN_BARS).unwrap();
        let b = OhlcvSeries::new("TEST", make_bars(&closes(30)), MIN_BARS).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        let c = OhlcvSeries::new("OTHER", make_bars(&closes(30)), MIN_BARS).unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
