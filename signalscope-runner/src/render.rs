//! Chart rendering collaborator.
//!
//! One renderer, parameterised by a list of named overlays. The CSV renderer
//! writes the OHLCV columns plus one column per overlay so any plotting tool
//! can draw the chart; nothing rendered here flows back into the analysis.

use crate::analysis::detect_signals;
use crate::report::ReportError;
use signalscope_core::indicators::compute_all;
use signalscope_core::{AnalysisConfig, OhlcvSeries};
use std::fs;
use std::path::{Path, PathBuf};

/// A named series drawn on top of the price chart.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Numeric line; NaN is a gap.
    Line { name: String, values: Vec<f64> },
    /// Event markers at bars where `flags` is true.
    Markers { name: String, flags: Vec<bool> },
}

impl Overlay {
    pub fn line(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::Line {
            name: name.into(),
            values,
        }
    }

    pub fn markers(name: impl Into<String>, flags: Vec<bool>) -> Self {
        Self::Markers {
            name: name.into(),
            flags,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Line { name, .. } | Self::Markers { name, .. } => name,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Line { values, .. } => values.len(),
            Self::Markers { flags, .. } => flags.len(),
        }
    }

    fn cell(&self, i: usize) -> String {
        match self {
            Self::Line { values, .. } => match values.get(i) {
                Some(v) if !v.is_nan() => v.to_string(),
                _ => String::new(),
            },
            Self::Markers { flags, .. } => match flags.get(i) {
                Some(true) => "1".to_string(),
                _ => String::new(),
            },
        }
    }
}

/// Output of one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderArtifact {
    pub path: PathBuf,
    pub columns: Vec<String>,
    pub rows: usize,
}

pub trait ChartRenderer {
    fn render(
        &self,
        series: &OhlcvSeries,
        overlays: &[Overlay],
        name: &str,
    ) -> Result<RenderArtifact, ReportError>;
}

/// Writes `<dir>/<name>.csv`.
pub struct CsvChartRenderer {
    dir: PathBuf,
}

impl CsvChartRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ChartRenderer for CsvChartRenderer {
    fn render(
        &self,
        series: &OhlcvSeries,
        overlays: &[Overlay],
        name: &str,
    ) -> Result<RenderArtifact, ReportError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{name}.csv"));

        let mut columns: Vec<String> = ["date", "open", "high", "low", "close", "volume"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        for overlay in overlays {
            if overlay.len() != series.len() {
                tracing::warn!(
                    overlay = overlay.name(),
                    expected = series.len(),
                    got = overlay.len(),
                    "overlay length differs from series"
                );
            }
            columns.push(overlay.name().to_string());
        }

        let mut wtr = csv::Writer::from_path(&path)?;
        wtr.write_record(&columns)?;
        for (i, bar) in series.bars().iter().enumerate() {
            let mut record = vec![
                bar.date.to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
            ];
            record.extend(overlays.iter().map(|o| o.cell(i)));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;

        tracing::info!(path = %path.display(), overlays = overlays.len(), "wrote chart data");
        Ok(RenderArtifact {
            path,
            columns,
            rows: series.len(),
        })
    }
}

/// Indicator lines drawn besides the configured moving averages.
const INDICATOR_LINES: [&str; 10] = [
    "bb_upper",
    "bb_middle",
    "bb_lower",
    "kdj_k",
    "kdj_d",
    "kdj_j",
    "rsi",
    "macd",
    "macd_signal",
    "macd_histogram",
];

/// Standard overlay set: every indicator line plus every detected event series.
pub fn overlays_for(series: &OhlcvSeries, config: &AnalysisConfig) -> Vec<Overlay> {
    let values = compute_all(series.bars(), config);

    let mut names = config.moving_averages.series_names();
    names.extend(INDICATOR_LINES.iter().map(|s| s.to_string()));

    let mut overlays: Vec<Overlay> = names
        .into_iter()
        .filter_map(|name| {
            let v = values.get_series(&name)?.to_vec();
            Some(Overlay::line(name, v))
        })
        .collect();

    overlays.extend(
        detect_signals(series, config)
            .into_iter()
            .map(|s| Overlay::markers(s.name, s.events)),
    );
    overlays
}
