//! Bollinger Bands.
//!
//! middle = SMA(close, period)
//! upper/lower = middle ± std_dev × population std of the same window
//! bandwidth = (upper - lower) / middle
//! percent_b = (close - lower) / (upper - lower)
//! A band width within machine precision of the middle collapses to zero.
//! Lookback: period - 1.

use crate::config::BollingerConfig;
use crate::domain::Bar;
use crate::indicator::IndicatorValues;
use crate::series::{rolling_mean, rolling_std};

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    std_dev: f64,
}

/// The five aligned Bollinger series.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
    pub bandwidth: Vec<f64>,
    pub percent_b: Vec<f64>,
}

impl Bollinger {
    pub fn new(period: usize, std_dev: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self { period, std_dev }
    }

    pub fn from_config(config: &BollingerConfig) -> Self {
        Self::new(config.period, config.std_dev)
    }

    pub fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    pub fn compute(&self, bars: &[Bar]) -> BollingerBands {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let middle = rolling_mean(&closes, self.period);
        let std = rolling_std(&closes, self.period, 0);
        let n = closes.len();

        let mut upper = vec![f64::NAN; n];
        let mut lower = vec![f64::NAN; n];
        let mut bandwidth = vec![f64::NAN; n];
        let mut percent_b = vec![f64::NAN; n];

        for i in 0..n {
            if middle[i].is_nan() || std[i].is_nan() {
                continue;
            }
            upper[i] = middle[i] + self.std_dev * std[i];
            lower[i] = middle[i] - self.std_dev * std[i];

            let mut range = upper[i] - lower[i];
            if range <= f64::EPSILON * middle[i].abs() {
                range = 0.0;
                upper[i] = middle[i];
                lower[i] = middle[i];
            }
            if middle[i] != 0.0 {
                bandwidth[i] = range / middle[i];
            }
            if range != 0.0 {
                percent_b[i] = (closes[i] - lower[i]) / range;
            }
        }

        BollingerBands {
            upper,
            middle,
            lower,
            bandwidth,
            percent_b,
        }
    }
}

impl BollingerBands {
    pub fn insert_into(self, values: &mut IndicatorValues) {
        values.insert("bb_upper", self.upper);
        values.insert("bb_middle", self.middle);
        values.insert("bb_lower", self.lower);
        values.insert("bb_width", self.bandwidth);
        values.insert("bb_percent_b", self.percent_b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn bands_known_values() {
        // window [2,4,4,4,5,5,7,9]: mean 5, population std 2
        let bars = make_bars(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let bb = Bollinger::new(8, 2.0).compute(&bars);

        assert!(bb.middle[6].is_nan());
        assert_approx(bb.middle[7], 5.0, DEFAULT_EPSILON);
        assert_approx(bb.upper[7], 9.0, DEFAULT_EPSILON);
        assert_approx(bb.lower[7], 1.0, DEFAULT_EPSILON);
        assert_approx(bb.bandwidth[7], 8.0 / 5.0, DEFAULT_EPSILON);
        // close 9 sits exactly on the upper band
        assert_approx(bb.percent_b[7], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_prices_collapse_bands() {
        let bars = make_bars(&[50.0; 25]);
        let bb = Bollinger::new(20, 2.0).compute(&bars);
        assert_approx(bb.upper[24], 50.0, DEFAULT_EPSILON);
        assert_approx(bb.lower[24], 50.0, DEFAULT_EPSILON);
        assert_approx(bb.bandwidth[24], 0.0, DEFAULT_EPSILON);
        // zero range leaves %B undefined
        assert!(bb.percent_b[24].is_nan());
    }

    #[test]
    fn flat_prices_without_exact_binary_form_collapse_bands() {
        for price in [10.1, 19.99, 123.456] {
            let bars = make_bars(&vec![price; 120]);
            let bb = Bollinger::new(20, 2.0).compute(&bars);
            for i in 19..120 {
                assert_eq!(bb.upper[i], bb.lower[i], "bands split at {price}, bar {i}");
                assert_eq!(bb.middle[i], price);
                assert_eq!(bb.bandwidth[i], 0.0, "bandwidth at {price}, bar {i}");
                assert!(bb.percent_b[i].is_nan(), "%B defined at {price}, bar {i}");
            }
        }
    }

    #[test]
    fn band_ordering_holds() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 8.0).collect();
        let bb = Bollinger::new(20, 2.0).compute(&make_bars(&closes));
        for i in 19..60 {
            assert!(bb.lower[i] <= bb.middle[i] && bb.middle[i] <= bb.upper[i]);
        }
    }

    #[test]
    fn insert_into_names_series() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let mut values = IndicatorValues::new();
        Bollinger::new(2, 2.0).compute(&bars).insert_into(&mut values);
        assert_eq!(
            values.names(),
            vec!["bb_lower", "bb_middle", "bb_percent_b", "bb_upper", "bb_width"]
        );
    }
}
