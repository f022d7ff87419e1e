//! Forward-return analysis: what happened `h` bars after a signal fired.
//!
//! A signal at bar `i` contributes `(close[i+h] - close[i]) / close[i]` only
//! when bar `i+h` exists. Signals in the final `h` bars are counted in
//! `total_signals` but never extrapolated into the aggregate.

use crate::metrics::{max_f64, mean_f64, min_f64};
use serde::{Deserialize, Serialize};
use signalscope_core::series::true_indices;

/// Aggregated outcome of one signal series over a fixed holding horizon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalPerformance {
    /// Every signal occurrence considered, including those without a full horizon.
    pub total_signals: usize,
    /// Occurrences with a full horizon; the sample size of the figures below.
    pub count: usize,
    pub avg_return: f64,
    /// Fraction of counted occurrences with a strictly positive return.
    pub win_rate: f64,
    pub max_return: f64,
    pub min_return: f64,
}

impl SignalPerformance {
    /// Aggregate every occurrence of `signal`.
    pub fn compute(closes: &[f64], signal: &[bool], holding: usize) -> Self {
        Self::compute_from(closes, signal, holding, 0)
    }

    /// Aggregate only occurrences inside the last `window` bars.
    pub fn compute_recent(closes: &[f64], signal: &[bool], holding: usize, window: usize) -> Self {
        let from = signal.len().saturating_sub(window);
        Self::compute_from(closes, signal, holding, from)
    }

    fn compute_from(closes: &[f64], signal: &[bool], holding: usize, from: usize) -> Self {
        let total_signals = signal.iter().skip(from).filter(|&&s| s).count();
        let returns = forward_returns(closes, signal, holding, from);
        if returns.is_empty() {
            return Self {
                total_signals,
                ..Default::default()
            };
        }

        let wins = returns.iter().filter(|&&r| r > 0.0).count();
        Self {
            total_signals,
            count: returns.len(),
            avg_return: mean_f64(&returns),
            win_rate: wins as f64 / returns.len() as f64,
            max_return: max_f64(&returns),
            min_return: min_f64(&returns),
        }
    }
}

/// Per-occurrence forward returns for signals at or after bar `from`.
pub fn forward_returns(closes: &[f64], signal: &[bool], holding: usize, from: usize) -> Vec<f64> {
    true_indices(signal)
        .into_iter()
        .filter(|&i| i >= from)
        .filter_map(|i| {
            let entry = *closes.get(i)?;
            let exit = *closes.get(i + holding)?;
            (entry != 0.0 && entry.is_finite() && exit.is_finite())
                .then(|| (exit - entry) / entry)
        })
        .collect()
}
