//! Series loading and data resolution for the runner.
//!
//! Implements the fallback policy for one symbol:
//! 1. If the cache covers the requested range → use it
//! 2. Otherwise, if a provider is available and not offline → fetch and cache
//! 3. If no fetch was attempted, a partially covering cache is used as is
//! 4. If synthetic mode is enabled → generate synthetic bars (tagged)
//! 5. Otherwise → fail; a failed download is always reported, never masked by
//!    stale cached bars
//!
//! Whatever the source, bars are cleaned and validated into an `OhlcvSeries`
//! with at least `min_bars` bars before anything is computed on them.

use chrono::NaiveDate;
use signalscope_core::data::{
    filter_range, generate_synthetic_bars, CoverageResult, DataError, DataProvider, DataSource,
    ParquetCache, RawBar,
};
use signalscope_core::domain::SeriesError;
use signalscope_core::{Bar, OhlcvSeries};
use thiserror::Error;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(
        "no cached data for '{symbol}' and no network access (use --synthetic for synthetic data)"
    )]
    NoCachedDataOffline { symbol: String },

    #[error("download failed for '{symbol}': {reason}")]
    DownloadFailed { symbol: String, reason: String },

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),
}

/// Options controlling how bars are loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// If true, never make network requests.
    pub offline: bool,
    /// If true, generate synthetic bars when real data is unavailable.
    pub synthetic: bool,
    /// Re-fetch even if the cache covers the range.
    pub force: bool,
    /// Minimum number of bars after cleaning.
    pub min_bars: usize,
}

/// A validated series plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: OhlcvSeries,
    pub source: DataSource,
}

impl LoadedSeries {
    pub fn is_synthetic(&self) -> bool {
        self.source == DataSource::Synthetic
    }
}

/// Load one symbol with cache/provider/synthetic fallback, then validate.
pub fn load_series(
    symbol: &str,
    cache: &ParquetCache,
    provider: Option<&dyn DataProvider>,
    opts: &LoadOptions,
) -> Result<LoadedSeries, LoadError> {
    let (bars, source) = resolve_bars(symbol, cache, provider, opts)?;
    let bars: Vec<Bar> = filter_range(bars, opts.start, opts.end)
        .into_iter()
        .map(Bar::from)
        .collect();
    let series = OhlcvSeries::from_raw(symbol, bars, opts.min_bars)?;

    tracing::info!(
        %symbol,
        %source,
        bars = series.len(),
        start = %series.first_date(),
        end = %series.last_date(),
        "loaded series"
    );
    Ok(LoadedSeries { series, source })
}

/// Validate bars that did not come through the loader (e.g. a CSV import).
pub fn series_from_bars(
    symbol: &str,
    bars: Vec<RawBar>,
    opts: &LoadOptions,
) -> Result<OhlcvSeries, LoadError> {
    let bars: Vec<Bar> = filter_range(bars, opts.start, opts.end)
        .into_iter()
        .map(Bar::from)
        .collect();
    Ok(OhlcvSeries::from_raw(symbol, bars, opts.min_bars)?)
}

fn resolve_bars(
    symbol: &str,
    cache: &ParquetCache,
    provider: Option<&dyn DataProvider>,
    opts: &LoadOptions,
) -> Result<(Vec<RawBar>, DataSource), LoadError> {
    // Step 1: cache
    let mut partial_cache = false;
    if !opts.force {
        match cache.covers_range(symbol, opts.start, opts.end) {
            CoverageResult::FullyCovered => match cache.load(symbol) {
                Ok(bars) => return Ok((bars, DataSource::Cache)),
                Err(e) => tracing::warn!(%symbol, error = %e, "cache unreadable"),
            },
            CoverageResult::PartiallyCovered {
                cached_start,
                cached_end,
            } => {
                tracing::debug!(%symbol, %cached_start, %cached_end, "cache partially covers range");
                partial_cache = true;
            }
            CoverageResult::NotCached => {}
        }
    }

    // Step 2: provider
    let mut failure: Option<String> = None;
    if !opts.offline {
        if let Some(prov) = provider.filter(|p| p.is_available()) {
            match prov.fetch(symbol, opts.start, opts.end) {
                Ok(fetched) => {
                    if let Err(e) = cache.write(symbol, &fetched.bars, fetched.source) {
                        tracing::warn!(%symbol, error = %e, "failed to cache fetched bars");
                    }
                    return Ok((fetched.bars, fetched.source));
                }
                Err(e) => {
                    tracing::warn!(%symbol, provider = prov.name(), error = %e, "fetch failed");
                    failure = Some(e.to_string());
                }
            }
        }
    }

    // Offline (or provider-less) runs fall back to whatever history is cached.
    if partial_cache && failure.is_none() {
        if let Ok(bars) = cache.load(symbol) {
            tracing::warn!(%symbol, "using partially cached range");
            return Ok((bars, DataSource::Cache));
        }
    }

    // Step 3: synthetic fallback
    if opts.synthetic {
        tracing::warn!(%symbol, "generating synthetic data; results are tagged as synthetic");
        return Ok((
            generate_synthetic_bars(symbol, opts.start, opts.end),
            DataSource::Synthetic,
        ));
    }

    // Step 4: fail
    if opts.offline {
        return Err(LoadError::NoCachedDataOffline {
            symbol: symbol.to_string(),
        });
    }
    Err(LoadError::DownloadFailed {
        symbol: symbol.to_string(),
        reason: failure.unwrap_or_else(|| "no data provider available".into()),
    })
}
