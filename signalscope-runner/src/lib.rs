//! SignalScope Runner: statistics, per-indicator analyses, reports, batch runs.
//!
//! This crate builds on `signalscope-core` to provide:
//! - Data loading with cache/download/synthetic fallback
//! - Basic statistics, risk metrics and forward-return analysis
//! - Moving-average, Bollinger, KDJ/RSI and MACD analyses
//! - Text/JSON report persistence and CSV chart overlays
//! - Parallel multi-symbol batch runs

pub mod analysis;
pub mod batch;
pub mod data_loader;
pub mod forward_returns;
pub mod metrics;
pub mod render;
pub mod report;
pub mod risk;

pub use analysis::{analyze_series, detect_signals, AnalysisReport, NamedSignal};
pub use batch::{analyze_batch, run_batch, BatchOutcome};
pub use data_loader::{load_series, series_from_bars, LoadError, LoadOptions, LoadedSeries};
pub use forward_returns::SignalPerformance;
pub use metrics::BasicStats;
pub use render::{overlays_for, ChartRenderer, CsvChartRenderer, Overlay, RenderArtifact};
pub use report::{JsonReportWriter, ReportError, ReportSink, TextReportWriter};
pub use risk::RiskMetrics;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use signalscope_core::{Bar, OhlcvSeries};

    /// Daily series from closes: open = previous close, high/low ±1, volume 1000.
    pub fn series_from(closes: &[f64]) -> OhlcvSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                Bar {
                    date: base + chrono::Duration::days(i as i64),
                    open,
                    high: open.max(close) + 1.0,
                    low: open.min(close) - 1.0,
                    close,
                    volume: 1000.0,
                }
            })
            .collect();
        OhlcvSeries::new("TEST", bars, 1).unwrap()
    }
}

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn report_is_send_sync() {
        assert_send::<AnalysisReport>();
        assert_sync::<AnalysisReport>();
    }

    #[test]
    fn statistics_are_send_sync() {
        assert_send::<BasicStats>();
        assert_sync::<BasicStats>();
        assert_send::<RiskMetrics>();
        assert_sync::<RiskMetrics>();
        assert_send::<SignalPerformance>();
        assert_sync::<SignalPerformance>();
    }

    #[test]
    fn loader_types_are_send_sync() {
        assert_send::<LoadOptions>();
        assert_sync::<LoadOptions>();
        assert_send::<LoadedSeries>();
        assert_sync::<LoadedSeries>();
        assert_send::<BatchOutcome>();
    }

    #[test]
    fn writers_are_send_sync() {
        assert_send::<TextReportWriter>();
        assert_sync::<TextReportWriter>();
        assert_send::<JsonReportWriter>();
        assert_sync::<JsonReportWriter>();
        assert_send::<CsvChartRenderer>();
        assert_sync::<CsvChartRenderer>();
    }
}
