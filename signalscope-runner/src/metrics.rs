//! Basic statistics: pure functions over a validated OHLCV series.
//!
//! Every metric is a pure function: prices and/or returns in, scalar out.
//! Return-based figures are fractions (0.01 = 1%); formatting to percentages
//! happens at report time.

use serde::{Deserialize, Serialize};
use signalscope_core::series;
use signalscope_core::OhlcvSeries;

/// Close-price statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub current: f64,
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub std: f64,
    pub range: f64,
}

/// Per-bar return statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStats {
    /// last / first - 1 over the whole series.
    pub total_return: f64,
    pub mean: f64,
    pub std: f64,
    pub max: f64,
    pub min: f64,
    pub positive_days: usize,
    pub negative_days: usize,
    /// Fraction of returns that are strictly positive.
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub std: f64,
}

/// Price, return and volume statistics for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    pub trading_days: usize,
    pub price: PriceStats,
    pub returns: ReturnStats,
    pub volume: VolumeStats,
}

impl BasicStats {
    pub fn compute(series: &OhlcvSeries) -> Self {
        let closes = series.closes();
        let volumes = series.volumes();
        let returns = finite_returns(&closes);

        let price = PriceStats {
            current: series.last_close(),
            max: max_f64(&closes),
            min: min_f64(&closes),
            mean: mean_f64(&closes),
            std: std_dev(&closes),
            range: max_f64(&closes) - min_f64(&closes),
        };

        let positive_days = returns.iter().filter(|&&r| r > 0.0).count();
        let negative_days = returns.iter().filter(|&&r| r < 0.0).count();
        let win_rate = if returns.is_empty() {
            0.0
        } else {
            positive_days as f64 / returns.len() as f64
        };

        let returns_stats = ReturnStats {
            total_return: total_return(&closes),
            mean: mean_f64(&returns),
            std: std_dev(&returns),
            max: max_f64(&returns),
            min: min_f64(&returns),
            positive_days,
            negative_days,
            win_rate,
        };

        let volume = VolumeStats {
            mean: mean_f64(&volumes),
            max: max_f64(&volumes),
            min: min_f64(&volumes),
            std: std_dev(&volumes),
        };

        Self {
            trading_days: series.len(),
            price,
            returns: returns_stats,
            volume,
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction: last / first - 1.
pub fn total_return(prices: &[f64]) -> f64 {
    match (prices.first(), prices.last()) {
        (Some(&first), Some(&last)) if prices.len() >= 2 && first > 0.0 => last / first - 1.0,
        _ => 0.0,
    }
}

/// Per-bar returns with undefined entries (zero previous price) removed.
pub fn finite_returns(prices: &[f64]) -> Vec<f64> {
    series::returns(prices)
        .into_iter()
        .filter(|r| r.is_finite())
        .collect()
}

/// Percentile with linear interpolation between closest ranks.
///
/// `q` is in `[0, 100]`. Matches the common "linear" definition: the rank is
/// `q/100 * (n-1)` over the sorted values. Returns 0.0 for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). 0.0 below two values.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

pub(crate) fn max_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

pub(crate) fn min_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().fold(f64::INFINITY, f64::min)
}
