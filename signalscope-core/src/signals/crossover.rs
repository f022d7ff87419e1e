//! Golden/death crosses between paired series.

use crate::config::CrossPair;
use crate::indicator::IndicatorValues;
use crate::series::{count_true, detect_crossing};

#[derive(Debug, Clone, PartialEq)]
pub struct CrossSignals {
    pub golden: Vec<bool>,
    pub death: Vec<bool>,
}

impl CrossSignals {
    pub fn detect(fast: &[f64], slow: &[f64]) -> Self {
        let (golden, death) = detect_crossing(fast, slow);
        Self { golden, death }
    }

    pub fn golden_count(&self) -> usize {
        count_true(&self.golden)
    }

    pub fn death_count(&self) -> usize {
        count_true(&self.death)
    }

    pub fn total(&self) -> usize {
        self.golden_count() + self.death_count()
    }
}

/// Crossings for every configured pair whose series are both present.
///
/// Pairs naming a series that was not computed are skipped with a warning.
pub fn ma_crosses(values: &IndicatorValues, pairs: &[CrossPair]) -> Vec<(CrossPair, CrossSignals)> {
    pairs
        .iter()
        .filter_map(|pair| {
            match (values.get_series(&pair.fast), values.get_series(&pair.slow)) {
                (Some(fast), Some(slow)) => Some((pair.clone(), CrossSignals::detect(fast, slow))),
                _ => {
                    tracing::warn!(pair = %pair.label(), "cross pair references a missing series");
                    None
                }
            }
        })
        .collect()
}
