//! Domain types: bars and validated OHLCV series.

pub mod bar;
pub mod ohlcv;

pub use bar::Bar;
pub use ohlcv::{clean_bars, CleanStats, OhlcvSeries, SeriesError, MIN_BARS};
