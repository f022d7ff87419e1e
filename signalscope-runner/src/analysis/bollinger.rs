//! Bollinger analysis: breakouts, squeeze episodes, current band status.

use super::NamedSignal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use signalscope_core::indicators::Bollinger;
use signalscope_core::series::{last_defined, rolling_mean};
use signalscope_core::signals::{
    classify_breakout, find_episodes, squeeze_flags, BandBreakouts, SqueezeOutcome,
};
use signalscope_core::{AnalysisConfig, OhlcvSeries};

const WIDE_FACTOR: f64 = 1.2;
const NARROW_FACTOR: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandPosition {
    AboveUpper,
    BelowLower,
    AboveMiddle,
    BelowMiddle,
}

impl std::fmt::Display for BandPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AboveUpper => "above upper band",
            Self::BelowLower => "below lower band",
            Self::AboveMiddle => "above middle band",
            Self::BelowMiddle => "below middle band",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthStatus {
    Wide,
    Narrow,
    Normal,
}

impl std::fmt::Display for WidthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Wide => "wide",
            Self::Narrow => "narrow",
            Self::Normal => "normal",
        };
        f.write_str(s)
    }
}

/// A squeeze episode with dates and, when classifiable, its breakout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqueezeReport {
    pub start: usize,
    pub end: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration: usize,
    pub completed: bool,
    /// `None` for open episodes and when the lookahead runs past the series.
    pub outcome: Option<SqueezeOutcome>,
}

/// Band state at the last bar. Fields are `None` while still in warm-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandStatus {
    pub upper: Option<f64>,
    pub middle: Option<f64>,
    pub lower: Option<f64>,
    pub bandwidth: Option<f64>,
    pub percent_b: Option<f64>,
    pub position: Option<BandPosition>,
    pub width: Option<WidthStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerSummary {
    pub upper_breakouts: usize,
    pub lower_breakouts: usize,
    pub squeezes: Vec<SqueezeReport>,
    pub status: BandStatus,
}

impl BollingerSummary {
    pub fn completed_squeezes(&self) -> usize {
        self.squeezes.iter().filter(|s| s.completed).count()
    }
}

pub fn analyze(
    series: &OhlcvSeries,
    config: &AnalysisConfig,
) -> (BollingerSummary, Vec<NamedSignal>) {
    let closes = series.closes();
    let dates = series.dates();
    let bands = Bollinger::from_config(&config.bollinger).compute(series.bars());
    let breakouts = BandBreakouts::detect(&closes, &bands.upper, &bands.lower);

    let squeeze = &config.squeeze;
    let flags = squeeze_flags(&bands.bandwidth, squeeze.window);
    let squeezes: Vec<SqueezeReport> = find_episodes(&flags)
        .into_iter()
        .map(|ep| SqueezeReport {
            start: ep.start,
            end: ep.end,
            start_date: dates[ep.start],
            end_date: dates[ep.end],
            duration: ep.duration(),
            completed: ep.completed,
            outcome: if ep.completed {
                classify_breakout(&closes, ep.end, squeeze.lookahead, squeeze.threshold)
            } else {
                None
            },
        })
        .collect();

    let close = series.last_close();
    let middle = last_defined(&bands.middle);
    let upper = last_defined(&bands.upper);
    let lower = last_defined(&bands.lower);
    let bandwidth = last_defined(&bands.bandwidth);
    let width_mean = last_defined(&rolling_mean(&bands.bandwidth, squeeze.window));

    let status = BandStatus {
        upper,
        middle,
        lower,
        bandwidth,
        percent_b: last_defined(&bands.percent_b),
        position: match (upper, middle, lower) {
            (Some(u), Some(m), Some(l)) => Some(band_position(close, u, m, l)),
            _ => None,
        },
        width: match (bandwidth, width_mean) {
            (Some(w), Some(mean)) => Some(width_status(w, mean)),
            _ => None,
        },
    };

    tracing::debug!(
        squeezes = squeezes.len(),
        upper_breakouts = breakouts.upper_count(),
        lower_breakouts = breakouts.lower_count(),
        "bollinger analyzed"
    );

    let summary = BollingerSummary {
        upper_breakouts: breakouts.upper_count(),
        lower_breakouts: breakouts.lower_count(),
        squeezes,
        status,
    };
    let signals = vec![
        NamedSignal::new("bb upper breakout", breakouts.upper_entries),
        NamedSignal::new("bb lower breakout", breakouts.lower_entries),
    ];
    (summary, signals)
}

pub fn band_position(close: f64, upper: f64, middle: f64, lower: f64) -> BandPosition {
    if close > upper {
        BandPosition::AboveUpper
    } else if close < lower {
        BandPosition::BelowLower
    } else if close > middle {
        BandPosition::AboveMiddle
    } else {
        BandPosition::BelowMiddle
    }
}

pub fn width_status(width: f64, trailing_mean: f64) -> WidthStatus {
    if width > trailing_mean * WIDE_FACTOR {
        WidthStatus::Wide
    } else if width < trailing_mean * NARROW_FACTOR {
        WidthStatus::Narrow
    } else {
        WidthStatus::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::series_from;

    #[test]
    fn position_classification() {
        assert_eq!(band_position(111.0, 110.0, 100.0, 90.0), BandPosition::AboveUpper);
        assert_eq!(band_position(89.0, 110.0, 100.0, 90.0), BandPosition::BelowLower);
        assert_eq!(band_position(105.0, 110.0, 100.0, 90.0), BandPosition::AboveMiddle);
        assert_eq!(band_position(100.0, 110.0, 100.0, 90.0), BandPosition::BelowMiddle);
    }

    #[test]
    fn width_classification() {
        assert_eq!(width_status(0.13, 0.10), WidthStatus::Wide);
        assert_eq!(width_status(0.07, 0.10), WidthStatus::Narrow);
        assert_eq!(width_status(0.10, 0.10), WidthStatus::Normal);
    }

    #[test]
    fn flat_series_has_no_breakouts() {
        let (summary, signals) = analyze(&series_from(&[100.0; 60]), &AnalysisConfig::default());
        assert_eq!(summary.upper_breakouts, 0);
        assert_eq!(summary.lower_breakouts, 0);
        assert_eq!(summary.status.bandwidth, Some(0.0));
        assert!(signals.iter().all(|s| s.count() == 0));
    }

    #[test]
    fn short_series_reports_undefined_status() {
        let (summary, _) = analyze(&series_from(&[100.0; 10]), &AnalysisConfig::default());
        assert_eq!(summary.status.position, None);
        assert_eq!(summary.status.width, None);
        assert!(summary.squeezes.is_empty());
    }

    #[test]
    fn squeeze_after_volatility_collapse_is_reported() {
        let mut closes: Vec<f64> = (0..60)
            .map(|i| if i % 2 == 0 { 110.0 } else { 90.0 })
            .collect();
        closes.extend((0..40).map(|i| 100.0 + 0.01 * (i % 2) as f64));
        let (summary, _) = analyze(&series_from(&closes), &AnalysisConfig::default());

        assert!(!summary.squeezes.is_empty());
        for sq in &summary.squeezes {
            assert_eq!(sq.duration, sq.end - sq.start + 1);
            if !sq.completed {
                assert!(sq.outcome.is_none());
            }
        }
    }
}
