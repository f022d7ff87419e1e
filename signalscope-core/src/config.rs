//! Analysis configuration.
//!
//! Every period and threshold the calculators and analyses use lives here and
//! is passed in by reference, so runs with different parameters never share
//! state. Serialized as TOML; every section falls back to its defaults when
//! omitted.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete parameter set for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub moving_averages: MovingAverageConfig,
    pub bollinger: BollingerConfig,
    pub kdj: KdjConfig,
    pub rsi: RsiConfig,
    pub macd: MacdConfig,
    pub squeeze: SqueezeConfig,
    pub forward: ForwardConfig,
    pub data: DataConfig,
}

/// A named pair of moving-average series checked for crossings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrossPair {
    pub fast: String,
    pub slow: String,
}

impl CrossPair {
    pub fn new(fast: impl Into<String>, slow: impl Into<String>) -> Self {
        Self {
            fast: fast.into(),
            slow: slow.into(),
        }
    }

    /// Display label, e.g. `sma_5/sma_10`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.fast, self.slow)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovingAverageConfig {
    pub sma_periods: Vec<usize>,
    pub ema_periods: Vec<usize>,
    pub cross_pairs: Vec<CrossPair>,
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self {
            sma_periods: vec![5, 10, 20, 60],
            ema_periods: vec![12, 26],
            cross_pairs: vec![
                CrossPair::new("sma_5", "sma_10"),
                CrossPair::new("sma_5", "sma_20"),
                CrossPair::new("sma_10", "sma_20"),
                CrossPair::new("sma_20", "sma_60"),
                CrossPair::new("ema_12", "ema_26"),
            ],
        }
    }
}

impl MovingAverageConfig {
    /// Series names of every configured moving average, SMAs first.
    pub fn series_names(&self) -> Vec<String> {
        self.sma_periods
            .iter()
            .map(|p| format!("sma_{p}"))
            .chain(self.ema_periods.iter().map(|p| format!("ema_{p}")))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BollingerConfig {
    pub period: usize,
    pub std_dev: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KdjConfig {
    pub fastk_period: usize,
    pub slowk_period: usize,
    pub slowd_period: usize,
    /// J above this level is overbought.
    pub overbought: f64,
    /// J below this level is oversold.
    pub oversold: f64,
}

impl Default for KdjConfig {
    fn default() -> Self {
        Self {
            fastk_period: 9,
            slowk_period: 3,
            slowd_period: 3,
            overbought: 100.0,
            oversold: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RsiConfig {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
    pub midline: f64,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            period: 14,
            overbought: 70.0,
            oversold: 30.0,
            midline: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MacdConfig {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// Bollinger squeeze detection and breakout classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SqueezeConfig {
    /// Trailing window for the bandwidth mean and standard deviation.
    pub window: usize,
    /// Bars after the episode end used to classify the breakout.
    pub lookahead: usize,
    /// Fractional price change beyond which a breakout is up or down.
    pub threshold: f64,
}

impl Default for SqueezeConfig {
    fn default() -> Self {
        Self {
            window: 20,
            lookahead: 5,
            threshold: 0.02,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForwardConfig {
    pub holding_days: usize,
    /// Trailing bars in which regime entries are counted.
    pub analysis_days: usize,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            holding_days: 5,
            analysis_days: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub min_bars: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            min_bars: crate::domain::MIN_BARS,
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded analysis config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check periods, level ordering and cross-pair names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        let ma = &self.moving_averages;
        if ma.sma_periods.iter().chain(&ma.ema_periods).any(|&p| p == 0) {
            return invalid("moving average periods must be >= 1".into());
        }
        let names = ma.series_names();
        for pair in &ma.cross_pairs {
            for side in [&pair.fast, &pair.slow] {
                if !names.iter().any(|n| n == side) {
                    return invalid(format!(
                        "cross pair {} names unknown series '{side}'",
                        pair.label()
                    ));
                }
            }
        }

        if self.bollinger.period == 0 {
            return invalid("bollinger.period must be >= 1".into());
        }
        if !(self.bollinger.std_dev.is_finite() && self.bollinger.std_dev > 0.0) {
            return invalid("bollinger.std_dev must be positive".into());
        }

        let kdj = &self.kdj;
        if kdj.fastk_period == 0 || kdj.slowk_period == 0 || kdj.slowd_period == 0 {
            return invalid("kdj periods must be >= 1".into());
        }
        if kdj.oversold >= kdj.overbought {
            return invalid("kdj.oversold must be below kdj.overbought".into());
        }

        let rsi = &self.rsi;
        if rsi.period == 0 {
            return invalid("rsi.period must be >= 1".into());
        }
        if !(rsi.oversold < rsi.midline && rsi.midline < rsi.overbought) {
            return invalid("rsi levels must satisfy oversold < midline < overbought".into());
        }

        let macd = &self.macd;
        if macd.fast_period == 0 || macd.slow_period == 0 || macd.signal_period == 0 {
            return invalid("macd periods must be >= 1".into());
        }
        if macd.fast_period >= macd.slow_period {
            return invalid("macd.fast_period must be below macd.slow_period".into());
        }

        // sample std needs at least two points
        if self.squeeze.window < 2 {
            return invalid("squeeze.window must be >= 2".into());
        }
        if !(self.squeeze.threshold.is_finite() && self.squeeze.threshold >= 0.0) {
            return invalid("squeeze.threshold must be non-negative".into());
        }

        if self.forward.holding_days == 0 {
            return invalid("forward.holding_days must be >= 1".into());
        }
        if self.data.min_bars == 0 {
            return invalid("data.min_bars must be >= 1".into());
        }

        Ok(())
    }

    /// Deterministic BLAKE3 hash of this configuration.
    ///
    /// Identical parameter sets hash identically, so reports can be matched to
    /// the configuration that produced them.
    pub fn config_hash(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.moving_averages.sma_periods, vec![5, 10, 20, 60]);
        assert_eq!(config.moving_averages.cross_pairs.len(), 5);
        assert_eq!(config.kdj.overbought, 100.0);
        assert_eq!(config.squeeze.lookahead, 5);
        assert_eq!(config.data.min_bars, 30);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn partial_section_overrides_only_named_fields() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            [rsi]
            period = 9

            [squeeze]
            threshold = 0.05
            "#,
        )
        .unwrap();
        assert_eq!(config.rsi.period, 9);
        assert_eq!(config.rsi.overbought, 70.0);
        assert_eq!(config.squeeze.threshold, 0.05);
        assert_eq!(config.squeeze.window, 20);
    }

    #[test]
    fn toml_roundtrip_preserves_config() {
        let config = AnalysisConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = AnalysisConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn unknown_cross_pair_is_rejected() {
        let mut config = AnalysisConfig::default();
        config
            .moving_averages
            .cross_pairs
            .push(CrossPair::new("sma_5", "sma_200"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sma_200"));
    }

    #[test]
    fn macd_fast_must_be_below_slow() {
        let mut config = AnalysisConfig::default();
        config.macd.fast_period = 30;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = AnalysisConfig::from_toml_str("[rsi\nperiod = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn config_hash_tracks_parameters() {
        let a = AnalysisConfig::default();
        let mut b = AnalysisConfig::default();
        assert_eq!(a.config_hash(), b.config_hash());
        b.bollinger.std_dev = 2.5;
        assert_ne!(a.config_hash(), b.config_hash());
        assert_eq!(a.config_hash().len(), 64);
    }
}
