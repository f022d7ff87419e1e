//! Bollinger squeeze episodes and breakout classification.
//!
//! A bar is in a squeeze when bandwidth < rolling_mean(bandwidth) -
//! rolling_std(bandwidth), both over the same trailing window (sample std).
//! A contiguous run of squeeze bars is one episode.

use serde::{Deserialize, Serialize};

use crate::series::{rolling_mean, rolling_std};

/// Squeeze level series. Undefined positions are not in a squeeze.
pub fn squeeze_flags(bandwidth: &[f64], window: usize) -> Vec<bool> {
    let mean = rolling_mean(bandwidth, window);
    let std = rolling_std(bandwidth, window, 1);
    bandwidth
        .iter()
        .zip(mean.iter().zip(&std))
        .map(|(&bw, (&m, &s))| {
            let threshold = m - s;
            !bw.is_nan() && !threshold.is_nan() && bw < threshold
        })
        .collect()
}

/// One contiguous run of squeeze bars, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqueezeEpisode {
    pub start: usize,
    pub end: usize,
    /// False when the run is still open at the last bar.
    pub completed: bool,
}

impl SqueezeEpisode {
    pub fn duration(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Split a squeeze level series into episodes.
pub fn find_episodes(flags: &[bool]) -> Vec<SqueezeEpisode> {
    let mut episodes = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &flag) in flags.iter().enumerate() {
        match (flag, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                episodes.push(SqueezeEpisode {
                    start: s,
                    end: i - 1,
                    completed: true,
                });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        episodes.push(SqueezeEpisode {
            start: s,
            end: flags.len() - 1,
            completed: false,
        });
    }

    episodes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakoutDirection {
    Up,
    Down,
    Sideways,
}

impl std::fmt::Display for BreakoutDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Sideways => "sideways",
        };
        f.write_str(s)
    }
}

/// Price move after a squeeze episode ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SqueezeOutcome {
    pub end_price: f64,
    pub future_price: f64,
    /// Fractional change, e.g. 0.03 for +3%.
    pub change: f64,
    pub direction: BreakoutDirection,
}

/// Classify the move from `closes[end]` to `closes[end + lookahead]`.
///
/// Returns `None` when the lookahead bar does not exist or the end price is
/// zero or undefined.
pub fn classify_breakout(
    closes: &[f64],
    end: usize,
    lookahead: usize,
    threshold: f64,
) -> Option<SqueezeOutcome> {
    let end_price = *closes.get(end)?;
    let future_price = *closes.get(end + lookahead)?;
    if end_price == 0.0 || end_price.is_nan() || future_price.is_nan() {
        return None;
    }

    let change = (future_price - end_price) / end_price;
    let direction = if change > threshold {
        BreakoutDirection::Up
    } else if change < -threshold {
        BreakoutDirection::Down
    } else {
        BreakoutDirection::Sideways
    };

    Some(SqueezeOutcome {
        end_price,
        future_price,
        change,
        direction,
    })
}
