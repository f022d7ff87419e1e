//! MACD analysis: crosses, zero-line crosses, histogram turns, last-bar status.

use super::NamedSignal;
use serde::{Deserialize, Serialize};
use signalscope_core::indicators::Macd;
use signalscope_core::series::last_defined;
use signalscope_core::signals::{count_recent, MacdSignals};
use signalscope_core::{AnalysisConfig, OhlcvSeries};

/// Bars back from the last bar that count as a "recent" cross.
pub const RECENT_CROSS_BARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdTrend {
    /// Line above signal and above zero.
    StrongUp,
    /// Line above signal at or below zero.
    WeakRebound,
    /// Line below signal and below zero.
    WeakDown,
    Pullback,
}

impl std::fmt::Display for MacdTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::StrongUp => "strong uptrend",
            Self::WeakRebound => "weak rebound",
            Self::WeakDown => "weak downtrend",
            Self::Pullback => "pullback",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Momentum {
    Strengthening,
    Weakening,
    Flat,
}

impl std::fmt::Display for Momentum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Strengthening => "strengthening",
            Self::Weakening => "weakening",
            Self::Flat => "flat",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdStatus {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub trend: MacdTrend,
    pub momentum: Momentum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSummary {
    pub golden_crosses: usize,
    pub death_crosses: usize,
    pub zero_cross_up: usize,
    pub zero_cross_down: usize,
    pub histogram_turned_positive: usize,
    pub histogram_turned_negative: usize,
    /// `None` until the signal line is defined at the last bar.
    pub status: Option<MacdStatus>,
    pub recent_golden: bool,
    pub recent_death: bool,
}

pub fn analyze(series: &OhlcvSeries, config: &AnalysisConfig) -> (MacdSummary, Vec<NamedSignal>) {
    let lines = Macd::from_config(&config.macd).compute(series.bars());
    let detected = MacdSignals::detect(&lines);

    let status = match (
        last_defined(&lines.macd),
        last_defined(&lines.signal),
        last_defined(&lines.histogram),
    ) {
        (Some(macd), Some(signal), Some(histogram)) => {
            let previous = lines
                .histogram
                .len()
                .checked_sub(2)
                .and_then(|i| lines.histogram.get(i).copied());
            Some(MacdStatus {
                macd,
                signal,
                histogram,
                trend: trend(macd, signal),
                momentum: momentum(histogram, previous),
            })
        }
        _ => None,
    };

    let summary = MacdSummary {
        golden_crosses: detected.crosses.golden_count(),
        death_crosses: detected.crosses.death_count(),
        zero_cross_up: detected.zero_up_count(),
        zero_cross_down: detected.zero_down_count(),
        histogram_turned_positive: detected.histogram_positive_count(),
        histogram_turned_negative: detected.histogram_negative_count(),
        recent_golden: count_recent(&detected.crosses.golden, RECENT_CROSS_BARS) > 0,
        recent_death: count_recent(&detected.crosses.death, RECENT_CROSS_BARS) > 0,
        status,
    };

    tracing::debug!(
        golden = summary.golden_crosses,
        death = summary.death_crosses,
        "macd analyzed"
    );

    let signals = vec![
        NamedSignal::new("macd golden", detected.crosses.golden),
        NamedSignal::new("macd death", detected.crosses.death),
        NamedSignal::new("macd zero up", detected.zero_cross_up),
        NamedSignal::new("macd zero down", detected.zero_cross_down),
    ];
    (summary, signals)
}

pub fn trend(macd: f64, signal: f64) -> MacdTrend {
    if macd > signal && macd > 0.0 {
        MacdTrend::StrongUp
    } else if macd > signal {
        MacdTrend::WeakRebound
    } else if macd < signal && macd < 0.0 {
        MacdTrend::WeakDown
    } else {
        MacdTrend::Pullback
    }
}

/// Histogram direction against the previous bar; flat without a defined previous.
pub fn momentum(histogram: f64, previous: Option<f64>) -> Momentum {
    match previous.filter(|p| !p.is_nan()) {
        Some(p) if histogram > p => Momentum::Strengthening,
        Some(p) if histogram < p => Momentum::Weakening,
        _ => Momentum::Flat,
    }
}
