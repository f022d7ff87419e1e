//! KDJ and RSI analysis: regime entries, midline crosses, agreement.
//!
//! Entry counts are restricted to the last `analysis_days` bars; level
//! membership at the last bar is reported separately.

use super::NamedSignal;
use crate::forward_returns::SignalPerformance;
use serde::{Deserialize, Serialize};
use signalscope_core::indicators::{Kdj, Rsi};
use signalscope_core::series::{count_true, last_defined};
use signalscope_core::signals::{agreement, count_recent, CrossSignals, MidlineCrosses, RegimeSignals};
use signalscope_core::{AnalysisConfig, Indicator, OhlcvSeries};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdjSummary {
    pub k: Option<f64>,
    pub d: Option<f64>,
    pub j: Option<f64>,
    /// K crossing above D.
    pub golden_crosses: usize,
    pub death_crosses: usize,
    pub overbought_entries: usize,
    pub oversold_entries: usize,
    pub currently_overbought: bool,
    pub currently_oversold: bool,
    /// Forward returns after overbought entries in the last
    /// `analysis_days + holding_days` bars.
    pub overbought_returns: SignalPerformance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiSummary {
    pub value: Option<f64>,
    pub overbought_entries: usize,
    pub oversold_entries: usize,
    pub overbought_bars: usize,
    pub oversold_bars: usize,
    pub midline_bullish: usize,
    pub midline_bearish: usize,
    pub currently_overbought: bool,
    pub currently_oversold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscillatorSummary {
    /// Trailing window the entry counts cover.
    pub analysis_days: usize,
    pub kdj: KdjSummary,
    pub rsi: RsiSummary,
    /// Bars in the window where J and RSI are both overbought.
    pub both_overbought: usize,
    pub both_oversold: usize,
}

pub fn analyze(
    series: &OhlcvSeries,
    config: &AnalysisConfig,
) -> (OscillatorSummary, Vec<NamedSignal>) {
    let bars = series.bars();
    let closes = series.closes();
    let window = config.forward.analysis_days;

    let lines = Kdj::from_config(&config.kdj).compute(bars);
    let kdj_crosses = CrossSignals::detect(&lines.k, &lines.d);
    let kdj_regime = RegimeSignals::detect(&lines.j, config.kdj.overbought, config.kdj.oversold);

    let rsi_values = Rsi::new(config.rsi.period).compute(bars);
    let rsi_regime = RegimeSignals::detect(&rsi_values, config.rsi.overbought, config.rsi.oversold);
    let midline = MidlineCrosses::detect(&rsi_values, config.rsi.midline);

    let (both_ob, both_os) = agreement(&kdj_regime, &rsi_regime);

    let kdj = KdjSummary {
        k: last_defined(&lines.k),
        d: last_defined(&lines.d),
        j: last_defined(&lines.j),
        golden_crosses: kdj_crosses.golden_count(),
        death_crosses: kdj_crosses.death_count(),
        overbought_entries: count_recent(&kdj_regime.overbought_entries, window),
        oversold_entries: count_recent(&kdj_regime.oversold_entries, window),
        currently_overbought: kdj_regime.currently_overbought(),
        currently_oversold: kdj_regime.currently_oversold(),
        // analysis window plus the holding horizon
        overbought_returns: SignalPerformance::compute_recent(
            &closes,
            &kdj_regime.overbought_entries,
            config.forward.holding_days,
            window + config.forward.holding_days,
        ),
    };

    let rsi = RsiSummary {
        value: last_defined(&rsi_values),
        overbought_entries: count_recent(&rsi_regime.overbought_entries, window),
        oversold_entries: count_recent(&rsi_regime.oversold_entries, window),
        overbought_bars: count_recent(&rsi_regime.overbought, window),
        oversold_bars: count_recent(&rsi_regime.oversold, window),
        midline_bullish: count_true(&midline.bullish),
        midline_bearish: count_true(&midline.bearish),
        currently_overbought: rsi_regime.currently_overbought(),
        currently_oversold: rsi_regime.currently_oversold(),
    };

    tracing::debug!(
        kdj_overbought = kdj.overbought_entries,
        rsi_overbought = rsi.overbought_entries,
        "oscillators analyzed"
    );

    let summary = OscillatorSummary {
        analysis_days: window,
        kdj,
        rsi,
        both_overbought: count_recent(&both_ob, window),
        both_oversold: count_recent(&both_os, window),
    };
    let signals = vec![
        NamedSignal::new("kdj golden", kdj_crosses.golden),
        NamedSignal::new("kdj death", kdj_crosses.death),
        NamedSignal::new("kdj overbought", kdj_regime.overbought_entries),
        NamedSignal::new("kdj oversold", kdj_regime.oversold_entries),
        NamedSignal::new("rsi overbought", rsi_regime.overbought_entries),
        NamedSignal::new("rsi oversold", rsi_regime.oversold_entries),
    ];
    (summary, signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::series_from;

    fn oscillating(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + 15.0 * (i as f64 / 6.0).sin())
            .collect()
    }

    #[test]
    fn oscillating_series_enters_both_regimes() {
        let (summary, _) = analyze(&series_from(&oscillating(200)), &AnalysisConfig::default());
        assert!(summary.kdj.overbought_entries > 0);
        assert!(summary.kdj.oversold_entries > 0);
        assert!(summary.rsi.overbought_entries > 0);
        assert!(summary.rsi.oversold_entries > 0);
        assert!(summary.rsi.midline_bullish > 0);
        assert!(summary.kdj.golden_crosses > 0);
    }

    #[test]
    fn counts_limited_to_analysis_window() {
        let closes = oscillating(300);
        let mut config = AnalysisConfig::default();
        let (wide, _) = analyze(&series_from(&closes), &config);
        config.forward.analysis_days = 30;
        let (narrow, _) = analyze(&series_from(&closes), &config);

        assert!(narrow.kdj.overbought_entries <= wide.kdj.overbought_entries);
        assert!(narrow.rsi.oversold_entries <= wide.rsi.oversold_entries);
        assert_eq!(narrow.analysis_days, 30);
        // crosses are not windowed
        assert_eq!(narrow.kdj.golden_crosses, wide.kdj.golden_crosses);
    }

    #[test]
    fn overbought_returns_window_includes_holding_period() {
        let closes = oscillating(200);
        let series = series_from(&closes);
        let mut config = AnalysisConfig::default();
        let holding = config.forward.holding_days;

        let lines = Kdj::from_config(&config.kdj).compute(series.bars());
        let regime = RegimeSignals::detect(&lines.j, config.kdj.overbought, config.kdj.oversold);
        let last_with_horizon = regime
            .overbought_entries
            .iter()
            .enumerate()
            .rev()
            .find(|&(i, &e)| e && i + holding < closes.len())
            .map(|(i, _)| i)
            .unwrap();

        // The entry sits just before the last `analysis_days` bars.
        config.forward.analysis_days = closes.len() - last_with_horizon - 1;
        let (summary, _) = analyze(&series, &config);
        assert!(summary.kdj.overbought_returns.count >= 1);
    }

    #[test]
    fn flat_series_is_neutral() {
        let (summary, _) = analyze(&series_from(&[100.0; 60]), &AnalysisConfig::default());
        assert_eq!(summary.rsi.value, Some(50.0));
        assert_eq!(summary.rsi.overbought_entries, 0);
        assert_eq!(summary.kdj.overbought_entries, 0);
        assert_eq!(summary.both_overbought, 0);
        assert_eq!(summary.kdj.overbought_returns.count, 0);
    }

    #[test]
    fn emits_named_event_series() {
        let series = series_from(&oscillating(80));
        let (_, signals) = analyze(&series, &AnalysisConfig::default());
        assert_eq!(signals.len(), 6);
        assert!(signals.iter().all(|s| s.events.len() == series.len()));
    }
}
