//! Daily, weekly and monthly trend side by side.
//!
//! The daily series is resampled into ISO weeks and calendar months. Each
//! timeframe gets its own SMA set and MACD parameters; the trend bucket is
//! the share of defined SMAs the last close sits above.

use super::macd::trend as macd_trend;
use super::MacdTrend;
use serde::{Deserialize, Serialize};
use signalscope_core::data::{to_monthly, to_weekly};
use signalscope_core::indicators::{Macd, Sma};
use signalscope_core::series::last_defined;
use signalscope_core::{Bar, Indicator, OhlcvSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    pub fn ma_periods(self) -> &'static [usize] {
        match self {
            Self::Daily => &[5, 10, 20, 60],
            Self::Weekly => &[5, 10, 20],
            Self::Monthly => &[3, 6, 12],
        }
    }

    /// (fast, slow, signal)
    pub fn macd_periods(self) -> (usize, usize, usize) {
        match self {
            Self::Daily | Self::Weekly => (12, 26, 9),
            Self::Monthly => (6, 12, 5),
        }
    }

    fn bars(self, daily: &[Bar]) -> Vec<Bar> {
        match self {
            Self::Daily => daily.to_vec(),
            Self::Weekly => to_weekly(daily),
            Self::Monthly => to_monthly(daily),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeframeTrend {
    StrongUp,
    MildUp,
    MildDown,
    ClearDown,
    /// No SMA of the timeframe is defined yet.
    InsufficientData,
}

impl TimeframeTrend {
    pub fn from_ratio(above_ratio: f64) -> Self {
        if above_ratio >= 0.75 {
            Self::StrongUp
        } else if above_ratio >= 0.5 {
            Self::MildUp
        } else if above_ratio >= 0.25 {
            Self::MildDown
        } else {
            Self::ClearDown
        }
    }
}

impl std::fmt::Display for TimeframeTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::StrongUp => "strong uptrend",
            Self::MildUp => "mild uptrend",
            Self::MildDown => "mild downtrend",
            Self::ClearDown => "clear downtrend",
            Self::InsufficientData => "insufficient data",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeMacd {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub trend: MacdTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeStatus {
    pub timeframe: Timeframe,
    pub bars: usize,
    pub close: f64,
    /// Last bar over the one before it; 0 with a single bar.
    pub change: f64,
    /// SMAs of the timeframe defined at the last bar.
    pub defined_mas: usize,
    /// Fraction of defined SMAs the close is above; 0 when none is defined.
    pub above_ratio: f64,
    pub trend: TimeframeTrend,
    /// `None` until the signal line is defined.
    pub macd: Option<TimeframeMacd>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiTimeframeSummary {
    pub timeframes: Vec<TimeframeStatus>,
}

impl MultiTimeframeSummary {
    pub fn get(&self, timeframe: Timeframe) -> Option<&TimeframeStatus> {
        self.timeframes.iter().find(|s| s.timeframe == timeframe)
    }
}

pub fn analyze(series: &OhlcvSeries) -> MultiTimeframeSummary {
    let timeframes = Timeframe::ALL
        .iter()
        .filter_map(|&tf| status(tf, &tf.bars(series.bars())))
        .collect();
    MultiTimeframeSummary { timeframes }
}

fn status(timeframe: Timeframe, bars: &[Bar]) -> Option<TimeframeStatus> {
    let close = bars.last()?.close;
    let change = match bars.len().checked_sub(2).map(|i| bars[i].close) {
        Some(prev) if prev != 0.0 => (close - prev) / prev,
        _ => 0.0,
    };

    let mut defined = 0;
    let mut above = 0;
    for &period in timeframe.ma_periods() {
        let values = Sma::new(period).compute(bars);
        if let Some(ma) = values.last().copied().filter(|v| !v.is_nan()) {
            defined += 1;
            if close > ma {
                above += 1;
            }
        }
    }
    let (above_ratio, trend) = if defined == 0 {
        (0.0, TimeframeTrend::InsufficientData)
    } else {
        let ratio = above as f64 / defined as f64;
        (ratio, TimeframeTrend::from_ratio(ratio))
    };

    let (fast, slow, signal) = timeframe.macd_periods();
    let lines = Macd::new(fast, slow, signal).compute(bars);
    let macd = match (
        last_defined(&lines.macd),
        last_defined(&lines.signal),
        last_defined(&lines.histogram),
    ) {
        (Some(macd), Some(signal), Some(histogram)) => Some(TimeframeMacd {
            macd,
            signal,
            histogram,
            trend: macd_trend(macd, signal),
        }),
        _ => None,
    };

    tracing::debug!(%timeframe, bars = bars.len(), %trend, "timeframe analyzed");

    Some(TimeframeStatus {
        timeframe,
        bars: bars.len(),
        close,
        change,
        defined_mas: defined,
        above_ratio,
        trend,
        macd,
    })
}
