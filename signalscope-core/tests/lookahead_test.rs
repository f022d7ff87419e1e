//! Look-ahead contamination tests for every indicator.
//!
//! No indicator value at bar t may depend on price data from bar t+1 or later.
//!
//! Method: compute on a truncated series (bars 0..100) and the full series
//! (bars 0..200). Bars 0..100 must be identical between both runs.

use chrono::NaiveDate;
use signalscope_core::config::AnalysisConfig;
use signalscope_core::domain::Bar;
use signalscope_core::indicator::Indicator;
use signalscope_core::indicators::*;

/// N bars of deterministic OHLCV data with realistic variation.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        // Simple LCG walk
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05;
        price = (price + change).max(10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        bars.push(Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high: open.max(close) + 2.0,
            low: open.min(close) - 2.0,
            close,
            volume: 1000.0 + i as f64 * 100.0,
        });
    }

    bars
}

fn assert_prefix_identical(name: &str, truncated: &[f64], full: &[f64], truncated_len: usize) {
    assert_eq!(truncated.len(), truncated_len, "{name}: truncated length mismatch");
    for i in 0..truncated_len {
        let (t, f) = (truncated[i], full[i]);
        if t.is_nan() && f.is_nan() {
            continue;
        }
        assert!(
            !t.is_nan() && !f.is_nan(),
            "{name}: NaN mismatch at bar {i} (truncated={t}, full={f})"
        );
        assert!(
            (t - f).abs() < 1e-10,
            "{name}: look-ahead contamination at bar {i}: truncated={t}, full={f}"
        );
    }
}

fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[Bar], truncated_len: usize) {
    let full = indicator.compute(full_bars);
    let truncated = indicator.compute(&full_bars[..truncated_len]);
    assert_eq!(full.len(), full_bars.len());
    assert_prefix_identical(indicator.name(), &truncated, &full, truncated_len);
}

#[test]
fn lookahead_sma() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Sma::new(5), &bars, 100);
    assert_no_lookahead(&Sma::new(60), &bars, 100);
}

#[test]
fn lookahead_ema() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Ema::new(12), &bars, 100);
    assert_no_lookahead(&Ema::new(26), &bars, 100);
}

#[test]
fn lookahead_rsi() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Rsi::new(14), &bars, 100);
    assert_no_lookahead(&Rsi::new(6), &bars, 100);
}

#[test]
fn lookahead_bollinger() {
    let bars = make_test_bars(200);
    let bb = Bollinger::new(20, 2.0);
    let full = bb.compute(&bars);
    let trunc = bb.compute(&bars[..100]);
    assert_prefix_identical("bb_upper", &trunc.upper, &full.upper, 100);
    assert_prefix_identical("bb_lower", &trunc.lower, &full.lower, 100);
    assert_prefix_identical("bb_width", &trunc.bandwidth, &full.bandwidth, 100);
    assert_prefix_identical("bb_percent_b", &trunc.percent_b, &full.percent_b, 100);
}

#[test]
fn lookahead_kdj() {
    let bars = make_test_bars(200);
    let kdj = Kdj::new(9, 3, 3);
    let full = kdj.compute(&bars);
    let trunc = kdj.compute(&bars[..100]);
    assert_prefix_identical("kdj_k", &trunc.k, &full.k, 100);
    assert_prefix_identical("kdj_d", &trunc.d, &full.d, 100);
    assert_prefix_identical("kdj_j", &trunc.j, &full.j, 100);
}

#[test]
fn lookahead_macd() {
    let bars = make_test_bars(200);
    let macd = Macd::new(12, 26, 9);
    let full = macd.compute(&bars);
    let trunc = macd.compute(&bars[..100]);
    assert_prefix_identical("macd", &trunc.macd, &full.macd, 100);
    assert_prefix_identical("macd_signal", &trunc.signal, &full.signal, 100);
    assert_prefix_identical("macd_histogram", &trunc.histogram, &full.histogram, 100);
}

#[test]
fn lookahead_compute_all() {
    let bars = make_test_bars(200);
    let config = AnalysisConfig::default();
    let full = compute_all(&bars, &config);
    let trunc = compute_all(&bars[..100], &config);

    assert_eq!(full.names(), trunc.names());
    for (name, series) in trunc.iter() {
        let full_series = full.get_series(name).unwrap();
        assert_prefix_identical(name, series, full_series, 100);
    }
}
