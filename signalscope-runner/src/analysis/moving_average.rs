//! Moving-average system: cross frequency table, latest values, trend alignment.

use super::NamedSignal;
use serde::{Deserialize, Serialize};
use signalscope_core::indicators::{Ema, Sma};
use signalscope_core::series::last_defined;
use signalscope_core::signals::ma_crosses;
use signalscope_core::{AnalysisConfig, Indicator, IndicatorValues, OhlcvSeries};
use std::collections::BTreeMap;

/// Share of MAs the close must sit above for a bullish alignment.
const BULLISH_RATIO: f64 = 0.7;
/// Share at or below which the alignment is bearish.
const BEARISH_RATIO: f64 = 0.3;

/// One row of the cross-frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossFrequency {
    pub pair: String,
    pub golden: usize,
    pub death: usize,
    pub total: usize,
    pub bars: usize,
    /// bars / max(1, total).
    pub avg_interval: f64,
}

/// Close versus one moving average at the last bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaPosition {
    pub name: String,
    pub value: f64,
    pub above: bool,
    /// (close - ma) / ma.
    pub diff: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStatus {
    BullishAlignment,
    BearishAlignment,
    Ranging,
}

impl std::fmt::Display for TrendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BullishAlignment => "bullish alignment",
            Self::BearishAlignment => "bearish alignment",
            Self::Ranging => "ranging",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaSystemSummary {
    pub crosses: Vec<CrossFrequency>,
    /// Last value per MA; `None` while still in warm-up.
    pub latest: BTreeMap<String, Option<f64>>,
    pub positions: Vec<MaPosition>,
    /// Fraction of defined MAs the close is above.
    pub above_ratio: f64,
    pub trend: TrendStatus,
}

/// Every configured SMA and EMA as named series.
pub fn moving_averages(series: &OhlcvSeries, config: &AnalysisConfig) -> IndicatorValues {
    let bars = series.bars();
    let mut values = IndicatorValues::new();
    for &period in &config.moving_averages.sma_periods {
        let sma = Sma::new(period);
        values.insert(sma.name(), sma.compute(bars));
    }
    for &period in &config.moving_averages.ema_periods {
        let ema = Ema::new(period);
        values.insert(ema.name(), ema.compute(bars));
    }
    values
}

pub fn analyze(series: &OhlcvSeries, config: &AnalysisConfig) -> (MaSystemSummary, Vec<NamedSignal>) {
    let values = moving_averages(series, config);
    let bars = series.len();

    let mut crosses = Vec::new();
    let mut signals = Vec::new();
    for (pair, detected) in ma_crosses(&values, &config.moving_averages.cross_pairs) {
        let total = detected.total();
        crosses.push(CrossFrequency {
            pair: pair.label(),
            golden: detected.golden_count(),
            death: detected.death_count(),
            total,
            bars,
            avg_interval: bars as f64 / total.max(1) as f64,
        });
        signals.push(NamedSignal::new(format!("{} golden", pair.label()), detected.golden));
        signals.push(NamedSignal::new(format!("{} death", pair.label()), detected.death));
    }

    let latest: BTreeMap<String, Option<f64>> = values
        .iter()
        .map(|(name, v)| (name.to_string(), last_defined(v)))
        .collect();

    let close = series.last_close();
    let positions: Vec<MaPosition> = latest
        .iter()
        .filter_map(|(name, value)| {
            let value = (*value)?;
            Some(MaPosition {
                name: name.clone(),
                value,
                above: close > value,
                diff: if value != 0.0 { (close - value) / value } else { 0.0 },
            })
        })
        .collect();

    let above = positions.iter().filter(|p| p.above).count();
    let above_ratio = above as f64 / positions.len().max(1) as f64;
    let trend = trend_status(above, positions.len());

    tracing::debug!(pairs = crosses.len(), %trend, "moving-average system analyzed");

    (
        MaSystemSummary {
            crosses,
            latest,
            positions,
            above_ratio,
            trend,
        },
        signals,
    )
}

/// Classify alignment from how many of `total` MAs the close is above.
pub fn trend_status(above: usize, total: usize) -> TrendStatus {
    if total == 0 {
        return TrendStatus::Ranging;
    }
    let (above, total) = (above as f64, total as f64);
    if above >= total * BULLISH_RATIO {
        TrendStatus::BullishAlignment
    } else if above <= total * BEARISH_RATIO {
        TrendStatus::BearishAlignment
    } else {
        TrendStatus::Ranging
    }
}
