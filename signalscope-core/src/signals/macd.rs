//! MACD crossings, zero-line crosses and histogram turns.

use crate::indicators::MacdLines;
use crate::series::{count_true, cross_level};
use crate::signals::CrossSignals;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSignals {
    /// MACD line versus signal line.
    pub crosses: CrossSignals,
    pub zero_cross_up: Vec<bool>,
    pub zero_cross_down: Vec<bool>,
    pub histogram_positive: Vec<bool>,
    pub histogram_negative: Vec<bool>,
}

impl MacdSignals {
    pub fn detect(lines: &MacdLines) -> Self {
        let crosses = CrossSignals::detect(&lines.macd, &lines.signal);
        let (zero_cross_up, zero_cross_down) = cross_level(&lines.macd, 0.0);
        let (histogram_positive, histogram_negative) = cross_level(&lines.histogram, 0.0);
        Self {
            crosses,
            zero_cross_up,
            zero_cross_down,
            histogram_positive,
            histogram_negative,
        }
    }

    pub fn zero_up_count(&self) -> usize {
        count_true(&self.zero_cross_up)
    }

    pub fn zero_down_count(&self) -> usize {
        count_true(&self.zero_cross_down)
    }

    pub fn histogram_positive_count(&self) -> usize {
        count_true(&self.histogram_positive)
    }

    pub fn histogram_negative_count(&self) -> usize {
        count_true(&self.histogram_negative)
    }
}
