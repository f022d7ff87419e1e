//! Concrete indicator implementations.
//!
//! Single-series indicators (SMA, EMA, RSI) implement the `Indicator` trait.
//! Multi-series indicators (Bollinger, KDJ, MACD) return an output struct
//! holding every aligned series they produce.
//!
//! All calculators propagate NaN through their warm-up window and never
//! back-fill or interpolate.

pub mod bollinger;
pub mod ema;
pub mod kdj;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{Bollinger, BollingerBands};
pub use ema::{ema_of_series, Ema};
pub use kdj::{Kdj, KdjLines};
pub use macd::{Macd, MacdLines};
pub use rsi::{rsi_of_series, Rsi};
pub use sma::{sma_of_series, Sma};

use crate::config::AnalysisConfig;
use crate::domain::Bar;
use crate::indicator::{Indicator, IndicatorValues};

/// Compute every indicator the configuration names.
///
/// Series names: `sma_{p}`, `ema_{p}`, `bb_upper`, `bb_middle`, `bb_lower`,
/// `bb_width`, `bb_percent_b`, `kdj_k`, `kdj_d`, `kdj_j`, `rsi`, `macd`,
/// `macd_signal`, `macd_histogram`.
pub fn compute_all(bars: &[Bar], config: &AnalysisConfig) -> IndicatorValues {
    let mut values = IndicatorValues::new();

    for &period in &config.moving_averages.sma_periods {
        let sma = Sma::new(period);
        values.insert(sma.name(), sma.compute(bars));
    }
    for &period in &config.moving_averages.ema_periods {
        let ema = Ema::new(period);
        values.insert(ema.name(), ema.compute(bars));
    }

    let bb = Bollinger::from_config(&config.bollinger).compute(bars);
    bb.insert_into(&mut values);

    let kdj = Kdj::from_config(&config.kdj).compute(bars);
    kdj.insert_into(&mut values);

    values.insert("rsi", Rsi::new(config.rsi.period).compute(bars));

    let macd = Macd::from_config(&config.macd).compute(bars);
    macd.insert_into(&mut values);

    tracing::debug!(series = values.len(), bars = bars.len(), "computed indicators");
    values
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLCV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
