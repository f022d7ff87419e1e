//! Bollinger band breakouts.

use crate::series::{count_true, greater_than, less_than, rising_edges};

/// Close-versus-band level series and their entry events.
#[derive(Debug, Clone, PartialEq)]
pub struct BandBreakouts {
    /// close > upper
    pub above_upper: Vec<bool>,
    /// close < lower
    pub below_lower: Vec<bool>,
    pub upper_entries: Vec<bool>,
    pub lower_entries: Vec<bool>,
}

impl BandBreakouts {
    pub fn detect(closes: &[f64], upper: &[f64], lower: &[f64]) -> Self {
        let above_upper = greater_than(closes, upper);
        let below_lower = less_than(closes, lower);
        let upper_entries = rising_edges(&above_upper);
        let lower_entries = rising_edges(&below_lower);
        Self {
            above_upper,
            below_lower,
            upper_entries,
            lower_entries,
        }
    }

    pub fn upper_count(&self) -> usize {
        count_true(&self.upper_entries)
    }

    pub fn lower_count(&self) -> usize {
        count_true(&self.lower_entries)
    }
}
