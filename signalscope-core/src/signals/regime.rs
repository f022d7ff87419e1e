//! Overbought/oversold regimes and midline crosses for bounded oscillators.

use crate::series::{above, and, below, count_true, cross_level};

/// Level membership and entry events for one oscillator.
///
/// An overbought entry is a cross from at-or-below the level to above it; an
/// oversold entry is a cross from at-or-above the level to below it. Both
/// need a defined previous value.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeSignals {
    pub overbought: Vec<bool>,
    pub oversold: Vec<bool>,
    pub overbought_entries: Vec<bool>,
    pub oversold_entries: Vec<bool>,
}

impl RegimeSignals {
    pub fn detect(values: &[f64], overbought_level: f64, oversold_level: f64) -> Self {
        let (overbought_entries, _) = cross_level(values, overbought_level);
        let (_, oversold_entries) = cross_level(values, oversold_level);
        Self {
            overbought: above(values, overbought_level),
            oversold: below(values, oversold_level),
            overbought_entries,
            oversold_entries,
        }
    }

    pub fn overbought_entry_count(&self) -> usize {
        count_true(&self.overbought_entries)
    }

    pub fn oversold_entry_count(&self) -> usize {
        count_true(&self.oversold_entries)
    }

    /// Whether the last bar sits in the overbought region.
    pub fn currently_overbought(&self) -> bool {
        self.overbought.last().copied().unwrap_or(false)
    }

    pub fn currently_oversold(&self) -> bool {
        self.oversold.last().copied().unwrap_or(false)
    }
}

/// Crosses of an oscillator through its midline.
#[derive(Debug, Clone, PartialEq)]
pub struct MidlineCrosses {
    pub bullish: Vec<bool>,
    pub bearish: Vec<bool>,
}

impl MidlineCrosses {
    pub fn detect(values: &[f64], midline: f64) -> Self {
        let (bullish, bearish) = cross_level(values, midline);
        Self { bullish, bearish }
    }
}

/// Bars where two oscillators agree: `(both_overbought, both_oversold)`.
pub fn agreement(a: &RegimeSignals, b: &RegimeSignals) -> (Vec<bool>, Vec<bool>) {
    (
        and(&a.overbought, &b.overbought),
        and(&a.oversold, &b.oversold),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kdj_style_levels() {
        let j = [f64::NAN, 90.0, 105.0, 110.0, 95.0, -5.0, -8.0, 3.0];
        let r = RegimeSignals::detect(&j, 100.0, 0.0);
        assert_eq!(
            r.overbought,
            vec![false, false, true, true, false, false, false, false]
        );
        assert_eq!(
            r.overbought_entries,
            vec![false, false, true, false, false, false, false, false]
        );
        assert_eq!(
            r.oversold_entries,
            vec![false, false, false, false, false, true, false, false]
        );
        assert_eq!(r.overbought_entry_count(), 1);
        assert_eq!(r.oversold_entry_count(), 1);
        assert!(!r.currently_overbought());
    }

    #[test]
    fn no_entry_straight_out_of_warmup() {
        // first defined value is already overbought: no prior bar to cross from
        let r = RegimeSignals::detect(&[f64::NAN, 80.0, 85.0], 70.0, 30.0);
        assert_eq!(r.overbought, vec![false, true, true]);
        assert_eq!(r.overbought_entry_count(), 0);
        assert!(r.currently_overbought());
    }

    #[test]
    fn midline_crosses() {
        let m = MidlineCrosses::detect(&[40.0, 55.0, 60.0, 45.0], 50.0);
        assert_eq!(m.bullish, vec![false, true, false, false]);
        assert_eq!(m.bearish, vec![false, false, false, true]);
    }

    #[test]
    fn agreement_requires_both() {
        let a = RegimeSignals::detect(&[101.0, 101.0, -1.0], 100.0, 0.0);
        let b = RegimeSignals::detect(&[75.0, 50.0, 20.0], 70.0, 30.0);
        let (ob, os) = agreement(&a, &b);
        assert_eq!(ob, vec![true, false, false]);
        assert_eq!(os, vec![false, false, true]);
    }
}
