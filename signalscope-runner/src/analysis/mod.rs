//! Per-series analysis: one pure entry point from a validated series to a report.
//!
//! Each submodule analyzes one indicator family and returns a serializable
//! summary plus the named event series it detected. `analyze_series` stitches
//! them together with the basic/risk statistics and forward-return
//! performance of every event series, plus the daily/weekly/monthly trend
//! overview.

pub mod bollinger;
pub mod macd;
pub mod moving_average;
pub mod oscillators;
pub mod timeframe;

pub use bollinger::{BandPosition, BandStatus, BollingerSummary, SqueezeReport, WidthStatus};
pub use macd::{MacdStatus, MacdSummary, MacdTrend, Momentum};
pub use moving_average::{CrossFrequency, MaPosition, MaSystemSummary, TrendStatus};
pub use oscillators::{KdjSummary, OscillatorSummary, RsiSummary};
pub use timeframe::{MultiTimeframeSummary, Timeframe, TimeframeStatus, TimeframeTrend};

use crate::forward_returns::SignalPerformance;
use crate::metrics::BasicStats;
use crate::risk::RiskMetrics;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use signalscope_core::series::count_true;
use signalscope_core::{AnalysisConfig, OhlcvSeries};

/// An edge-triggered event series with a display name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSignal {
    pub name: String,
    pub events: Vec<bool>,
}

impl NamedSignal {
    pub fn new(name: impl Into<String>, events: Vec<bool>) -> Self {
        Self {
            name: name.into(),
            events,
        }
    }

    pub fn count(&self) -> usize {
        count_true(&self.events)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub bars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPerformance {
    pub name: String,
    pub performance: SignalPerformance,
}

/// Everything computed for one symbol. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: NaiveDateTime,
    pub symbol: String,
    pub period: AnalysisPeriod,
    pub config_hash: String,
    pub dataset_hash: String,
    pub holding_days: usize,
    pub basic: BasicStats,
    pub risk: RiskMetrics,
    pub signal_performance: Vec<NamedPerformance>,
    pub moving_averages: MaSystemSummary,
    pub bollinger: BollingerSummary,
    pub oscillators: OscillatorSummary,
    pub macd: MacdSummary,
    pub multi_timeframe: MultiTimeframeSummary,
}

impl AnalysisReport {
    pub fn performance(&self, name: &str) -> Option<&SignalPerformance> {
        self.signal_performance
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.performance)
    }
}

/// Every named event series the analyses detect, in report order.
pub fn detect_signals(series: &OhlcvSeries, config: &AnalysisConfig) -> Vec<NamedSignal> {
    let mut signals = moving_average::analyze(series, config).1;
    signals.extend(bollinger::analyze(series, config).1);
    signals.extend(oscillators::analyze(series, config).1);
    signals.extend(macd::analyze(series, config).1);
    signals
}

/// Analyze one series under one configuration.
pub fn analyze_series(series: &OhlcvSeries, config: &AnalysisConfig) -> AnalysisReport {
    let closes = series.closes();
    let holding = config.forward.holding_days;

    let (moving_averages, mut signals) = moving_average::analyze(series, config);
    let (bollinger, bb_signals) = bollinger::analyze(series, config);
    let (oscillators, osc_signals) = oscillators::analyze(series, config);
    let (macd, macd_signals) = macd::analyze(series, config);
    signals.extend(bb_signals);
    signals.extend(osc_signals);
    signals.extend(macd_signals);
    let multi_timeframe = timeframe::analyze(series);

    let signal_performance = signals
        .iter()
        .map(|s| NamedPerformance {
            name: s.name.clone(),
            performance: SignalPerformance::compute(&closes, &s.events, holding),
        })
        .collect();

    tracing::info!(
        symbol = series.symbol(),
        bars = series.len(),
        signals = signals.len(),
        "analysis complete"
    );

    AnalysisReport {
        generated_at: chrono::Local::now().naive_local(),
        symbol: series.symbol().to_string(),
        period: AnalysisPeriod {
            start: series.first_date(),
            end: series.last_date(),
            bars: series.len(),
        },
        config_hash: config.config_hash(),
        dataset_hash: series.fingerprint(),
        holding_days: holding,
        basic: BasicStats::compute(series),
        risk: RiskMetrics::compute(series),
        signal_performance,
        moving_averages,
        bollinger,
        oscillators,
        macd,
        multi_timeframe,
    }
}
