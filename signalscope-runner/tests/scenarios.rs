//! End-to-end scenarios at the report level.

use chrono::NaiveDate;
use signalscope_core::{AnalysisConfig, Bar, OhlcvSeries};
use signalscope_runner::analysis::{analyze_series, MacdTrend, TrendStatus};
use signalscope_runner::forward_returns::SignalPerformance;

fn series(closes: &[f64]) -> OhlcvSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base + chrono::Duration::days(i as i64),
            open: close,
            high: close + 0.5,
            low: close - 0.5,
            close,
            volume: 1_000_000.0,
        })
        .collect();
    OhlcvSeries::new("SCN", bars, 30).unwrap()
}

#[test]
fn ten_bars_horizon_five_signal_at_nine_yields_no_trades() {
    let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
    let mut signal = vec![false; 10];
    signal[9] = true;

    let perf = SignalPerformance::compute(&closes, &signal, 5);
    assert_eq!(perf.count, 0);
    assert_eq!(perf.avg_return, 0.0);
}

fn assert_flat_report_is_quiet(price: f64) {
    let report = analyze_series(&series(&[price; 80]), &AnalysisConfig::default());

    for row in &report.moving_averages.crosses {
        assert_eq!(row.total, 0, "{} crossed on a flat series", row.pair);
    }
    assert_eq!(report.bollinger.upper_breakouts, 0);
    assert_eq!(report.bollinger.lower_breakouts, 0);
    assert_eq!(report.bollinger.status.bandwidth, Some(0.0));
    assert_eq!(report.bollinger.status.upper, report.bollinger.status.lower);
    assert_eq!(report.bollinger.status.percent_b, None);
    assert!(report.bollinger.squeezes.is_empty());
    assert_eq!(report.oscillators.rsi.value, Some(50.0));

    let macd = report.macd.status.as_ref().unwrap();
    assert_eq!(macd.histogram, 0.0);
    assert_eq!(report.macd.golden_crosses + report.macd.death_crosses, 0);

    assert_eq!(report.risk.max_drawdown, 0.0);
    assert_eq!(report.risk.sharpe, 0.0);
    assert_eq!(report.risk.calmar, 0.0);
    assert!(report
        .signal_performance
        .iter()
        .all(|p| p.performance.total_signals == 0));
}

#[test]
fn flat_series_report_is_quiet() {
    assert_flat_report_is_quiet(100.0);
}

#[test]
fn flat_series_report_at_inexact_prices_is_quiet() {
    for price in [10.1, 19.99] {
        assert_flat_report_is_quiet(price);
    }
}

#[test]
fn steady_uptrend_report() {
    let closes: Vec<f64> = (0..120).map(|i| 100.0 * 1.005_f64.powi(i)).collect();
    let report = analyze_series(&series(&closes), &AnalysisConfig::default());

    assert_eq!(report.moving_averages.trend, TrendStatus::BullishAlignment);
    assert!(report.basic.returns.total_return > 0.0);
    assert_eq!(report.basic.returns.negative_days, 0);
    assert_eq!(report.risk.max_drawdown, 0.0);
    assert!(report.oscillators.rsi.currently_overbought);
    assert_eq!(
        report.macd.status.as_ref().map(|s| s.trend),
        Some(MacdTrend::StrongUp)
    );
}

#[test]
fn golden_cross_after_flat_start_has_forward_returns() {
    let mut closes = vec![100.0; 30];
    closes.extend((1..=40).map(|i| 100.0 + 0.5 * i as f64));
    let report = analyze_series(&series(&closes), &AnalysisConfig::default());

    let perf = report.performance("sma_5/sma_20 golden").unwrap();
    assert_eq!(perf.total_signals, 1);
    assert_eq!(perf.count, 1);
    assert!(perf.avg_return > 0.0);
    assert!((perf.win_rate - 1.0).abs() < 1e-12);
}
