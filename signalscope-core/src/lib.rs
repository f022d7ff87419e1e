//! SignalScope Core: domain types, indicators, signals, data sources.
//!
//! Data flows one way through this crate:
//! - OHLCV bars are fetched, cleaned and validated into an `OhlcvSeries`
//! - indicator calculators turn bars into aligned numeric series
//! - signal detectors turn numeric series into boolean event series
//!
//! Every calculator is a pure function of its input and an `AnalysisConfig`;
//! nothing here holds state between calls.

pub mod config;
pub mod data;
pub mod domain;
pub mod indicator;
pub mod indicators;
pub mod series;
pub mod signals;

pub use config::AnalysisConfig;
pub use domain::{Bar, OhlcvSeries};
pub use indicator::{Indicator, IndicatorValues};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed across batch worker threads are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::OhlcvSeries>();
        require_sync::<domain::OhlcvSeries>();
        require_send::<config::AnalysisConfig>();
        require_sync::<config::AnalysisConfig>();
        require_send::<indicator::IndicatorValues>();
        require_sync::<indicator::IndicatorValues>();

        require_send::<indicators::BollingerBands>();
        require_sync::<indicators::BollingerBands>();
        require_send::<indicators::KdjLines>();
        require_sync::<indicators::KdjLines>();
        require_send::<indicators::MacdLines>();
        require_sync::<indicators::MacdLines>();

        require_send::<signals::CrossSignals>();
        require_sync::<signals::CrossSignals>();
        require_send::<signals::SqueezeEpisode>();
        require_sync::<signals::SqueezeEpisode>();

        require_send::<data::ParquetCache>();
        require_sync::<data::ParquetCache>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
    }

    /// Single-series indicators are usable as trait objects.
    #[test]
    fn indicator_trait_objects_build() {
        let list: Vec<Box<dyn Indicator>> = vec![
            Box::new(indicators::Sma::new(5)),
            Box::new(indicators::Ema::new(12)),
            Box::new(indicators::Rsi::new(14)),
        ];
        let names: Vec<&str> = list.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["sma_5", "ema_12", "rsi_14"]);
    }
}
