//! Multi-symbol batch runs.
//!
//! Every run owns its series and shares only the read-only configuration, so
//! symbols are analyzed in parallel with rayon. Output order matches input order.

use crate::analysis::{analyze_series, AnalysisReport};
use crate::data_loader::{load_series, LoadError, LoadOptions};
use rayon::prelude::*;
use signalscope_core::data::{DataProvider, DataSource, ParquetCache};
use signalscope_core::{AnalysisConfig, OhlcvSeries};

/// Outcome of loading and analyzing one symbol in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub symbol: String,
    pub result: Result<(AnalysisReport, DataSource), LoadError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Analyze already-loaded series in parallel.
pub fn analyze_batch(inputs: &[OhlcvSeries], config: &AnalysisConfig) -> Vec<AnalysisReport> {
    inputs
        .par_iter()
        .map(|series| analyze_series(series, config))
        .collect()
}

/// Load and analyze several symbols in parallel.
///
/// A failure for one symbol is recorded in its outcome and never aborts the
/// others.
pub fn run_batch(
    symbols: &[String],
    cache: &ParquetCache,
    provider: Option<&dyn DataProvider>,
    opts: &LoadOptions,
    config: &AnalysisConfig,
) -> Vec<BatchOutcome> {
    let outcomes: Vec<BatchOutcome> = symbols
        .par_iter()
        .map(|symbol| {
            let result = load_series(symbol, cache, provider, opts)
                .map(|loaded| (analyze_series(&loaded.series, config), loaded.source));
            if let Err(e) = &result {
                tracing::warn!(%symbol, error = %e, "batch run failed");
            }
            BatchOutcome {
                symbol: symbol.clone(),
                result,
            }
        })
        .collect();

    let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
    tracing::info!(
        succeeded,
        failed = outcomes.len() - succeeded,
        total = outcomes.len(),
        "batch complete"
    );
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::series_from;
    use chrono::NaiveDate;

    #[test]
    fn batch_matches_sequential_runs() {
        let a: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 / 5.0).sin()).collect();
        let b: Vec<f64> = (0..80).map(|i| 50.0 + 0.2 * i as f64).collect();
        let inputs = vec![series_from(&a), series_from(&b)];
        let config = AnalysisConfig::default();

        let batch = analyze_batch(&inputs, &config);
        assert_eq!(batch.len(), 2);
        for (report, series) in batch.iter().zip(&inputs) {
            let mut single = analyze_series(series, &config);
            single.generated_at = report.generated_at;
            assert_eq!(report, &single);
        }
    }

    #[test]
    fn failures_do_not_abort_other_symbols() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = ParquetCache::new(tmp.path());
        let opts = LoadOptions {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            offline: true,
            synthetic: false,
            force: false,
            min_bars: 30,
        };
        let synthetic = signalscope_core::data::generate_synthetic_bars("AAA", opts.start, opts.end);
        cache.write("AAA", &synthetic, DataSource::Synthetic).unwrap();

        let symbols = vec!["AAA".to_string(), "MISSING".to_string()];
        let outcomes = run_batch(&symbols, &cache, None, &opts, &AnalysisConfig::default());

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].symbol, "AAA");
        assert!(outcomes[0].is_ok());
        assert!(matches!(
            outcomes[1].result,
            Err(LoadError::NoCachedDataOffline { .. })
        ));
    }
}
