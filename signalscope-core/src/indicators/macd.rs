//! Moving Average Convergence Divergence.
//!
//! macd = EMA(fast) - EMA(slow), signal = EMA(signal) of macd,
//! histogram = macd - signal.
//! Lookback: (slow - 1) + (signal - 1).

use crate::config::MacdConfig;
use crate::domain::Bar;
use crate::indicator::IndicatorValues;
use crate::indicators::ema_of_series;

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(
            fast >= 1 && slow >= 1 && signal >= 1,
            "MACD periods must be >= 1"
        );
        Self { fast, slow, signal }
    }

    pub fn from_config(config: &MacdConfig) -> Self {
        Self::new(config.fast_period, config.slow_period, config.signal_period)
    }

    pub fn lookback(&self) -> usize {
        (self.fast.max(self.slow) - 1) + (self.signal - 1)
    }

    pub fn compute(&self, bars: &[Bar]) -> MacdLines {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);

        let macd: Vec<f64> = fast
            .iter()
            .zip(&slow)
            .map(|(&f, &s)| if f.is_nan() || s.is_nan() { f64::NAN } else { f - s })
            .collect();
        let signal = ema_of_series(&macd, self.signal);
        let histogram = macd
            .iter()
            .zip(&signal)
            .map(|(&m, &s)| if m.is_nan() || s.is_nan() { f64::NAN } else { m - s })
            .collect();

        MacdLines {
            macd,
            signal,
            histogram,
        }
    }
}

impl MacdLines {
    pub fn insert_into(self, values: &mut IndicatorValues) {
        values.insert("macd", self.macd);
        values.insert("macd_signal", self.signal);
        values.insert("macd_histogram", self.histogram);
    }
}
