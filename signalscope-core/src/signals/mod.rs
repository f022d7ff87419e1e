//! Signal detectors: boolean event series derived from indicator output.
//!
//! Level series answer "is the condition holding at bar i". Event series are
//! edge-triggered and fire only at the bar where a condition newly holds.
//! A bar whose operands are undefined (warm-up) never fires.

pub mod breakout;
pub mod crossover;
pub mod macd;
pub mod regime;
pub mod squeeze;

pub use breakout::BandBreakouts;
pub use crossover::{ma_crosses, CrossSignals};
pub use macd::MacdSignals;
pub use regime::{agreement, MidlineCrosses, RegimeSignals};
pub use squeeze::{
    classify_breakout, find_episodes, squeeze_flags, BreakoutDirection, SqueezeEpisode,
    SqueezeOutcome,
};

/// Count events that fall inside the last `window` bars.
pub fn count_recent(events: &[bool], window: usize) -> usize {
    let start = events.len().saturating_sub(window);
    crate::series::count_true(&events[start..])
}

/// Index of the most recent event, if any.
pub fn last_event(events: &[bool]) -> Option<usize> {
    events.iter().rposition(|&e| e)
}
