//! Stochastic KDJ oscillator.
//!
//! raw %K = 100 × (close - lowest_low(fastk)) / (highest_high(fastk) - lowest_low(fastk))
//! K = SMA(slowk) of raw %K, D = SMA(slowd) of K, J = 3K - 2D.
//! Lookback: (fastk - 1) + (slowk - 1) + (slowd - 1).
//!
//! A window with zero high-low range has no defined %K; the NaN then runs
//! through the smoothing windows that contain it.

use crate::config::KdjConfig;
use crate::domain::Bar;
use crate::indicator::IndicatorValues;
use crate::indicators::sma_of_series;
use crate::series::{rolling_max, rolling_min};

#[derive(Debug, Clone)]
pub struct Kdj {
    fastk: usize,
    slowk: usize,
    slowd: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KdjLines {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
    pub j: Vec<f64>,
}

impl Kdj {
    pub fn new(fastk: usize, slowk: usize, slowd: usize) -> Self {
        assert!(
            fastk >= 1 && slowk >= 1 && slowd >= 1,
            "KDJ periods must be >= 1"
        );
        Self {
            fastk,
            slowk,
            slowd,
        }
    }

    pub fn from_config(config: &KdjConfig) -> Self {
        Self::new(config.fastk_period, config.slowk_period, config.slowd_period)
    }

    pub fn lookback(&self) -> usize {
        (self.fastk - 1) + (self.slowk - 1) + (self.slowd - 1)
    }

    pub fn compute(&self, bars: &[Bar]) -> KdjLines {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

        let hh = rolling_max(&highs, self.fastk);
        let ll = rolling_min(&lows, self.fastk);

        let raw_k: Vec<f64> = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let range = hh[i] - ll[i];
                if range.is_nan() || range == 0.0 {
                    f64::NAN
                } else {
                    100.0 * (bar.close - ll[i]) / range
                }
            })
            .collect();

        let k = sma_of_series(&raw_k, self.slowk);
        let d = sma_of_series(&k, self.slowd);
        let j = k
            .iter()
            .zip(&d)
            .map(|(&k, &d)| {
                if k.is_nan() || d.is_nan() {
                    f64::NAN
                } else {
                    3.0 * k - 2.0 * d
                }
            })
            .collect();

        KdjLines { k, d, j }
    }
}

impl KdjLines {
    pub fn insert_into(self, values: &mut IndicatorValues) {
        values.insert("kdj_k", self.k);
        values.insert("kdj_d", self.d);
        values.insert("kdj_j", self.j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    fn bar(day: u32, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high,
            low,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn raw_k_unsmoothed_known_value() {
        let bars = vec![
            bar(1, 12.0, 8.0, 10.0),
            bar(4, 14.0, 9.0, 13.0),
            bar(5, 15.0, 10.0, 14.0),
        ];
        // window of 3: HH = 15, LL = 8, close 14 → 100 × 6/7
        let lines = Kdj::new(3, 1, 1).compute(&bars);
        assert!(lines.k[1].is_nan());
        assert_approx(lines.k[2], 600.0 / 7.0, DEFAULT_EPSILON);
        assert_approx(lines.d[2], 600.0 / 7.0, DEFAULT_EPSILON);
        assert_approx(lines.j[2], 600.0 / 7.0, DEFAULT_EPSILON);
    }

    #[test]
    fn warmup_length_matches_lookback() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.5).sin() * 4.0).collect();
        let kdj = Kdj::new(9, 3, 3);
        let lines = kdj.compute(&make_bars(&closes));
        let lb = kdj.lookback();
        assert_eq!(lb, 12);
        assert!(lines.d[lb - 1].is_nan());
        assert!(!lines.d[lb].is_nan());
    }

    #[test]
    fn j_identity_holds() {
        let closes: Vec<f64> = (0..50).map(|i| 50.0 + (i as f64 * 0.9).cos() * 6.0).collect();
        let lines = Kdj::new(9, 3, 3).compute(&make_bars(&closes));
        for i in 0..closes.len() {
            if !lines.k[i].is_nan() && !lines.d[i].is_nan() {
                assert_approx(lines.j[i], 3.0 * lines.k[i] - 2.0 * lines.d[i], 1e-9);
            }
        }
    }

    #[test]
    fn zero_range_window_is_undefined() {
        let bars: Vec<Bar> = (1..=5).map(|d| bar(d, 10.0, 10.0, 10.0)).collect();
        let lines = Kdj::new(3, 1, 1).compute(&bars);
        assert!(lines.k.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn k_stays_within_bounds() {
        let closes: Vec<f64> = (0..60).map(|i| 20.0 + (i as f64 * 1.3).sin() * 3.0).collect();
        let lines = Kdj::new(9, 3, 3).compute(&make_bars(&closes));
        for &k in lines.k.iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(&k));
        }
    }
}
