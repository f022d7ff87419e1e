//! Risk metrics over a per-bar return series.
//!
//! All figures are fractions. Annualization assumes 252 trading days and a
//! zero risk-free rate.

use crate::metrics::{finite_returns, mean_f64, percentile, std_dev};
use serde::{Deserialize, Serialize};
use signalscope_core::OhlcvSeries;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Drawdown, tail and risk-adjusted return figures for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Minimum of the drawdown series; always <= 0.
    pub max_drawdown: f64,
    /// 5th percentile of returns.
    pub var_95: f64,
    /// 1st percentile of returns.
    pub var_99: f64,
    pub downside_volatility: f64,
    pub sharpe: f64,
    pub calmar: f64,
    pub annual_return: f64,
    pub annual_volatility: f64,
}

impl RiskMetrics {
    pub fn compute(series: &OhlcvSeries) -> Self {
        Self::from_returns(&finite_returns(&series.closes()))
    }

    pub fn from_returns(returns: &[f64]) -> Self {
        let max_drawdown = max_drawdown(returns);
        let annual_return = annualized_return(returns);
        Self {
            max_drawdown,
            var_95: value_at_risk(returns, 0.95),
            var_99: value_at_risk(returns, 0.99),
            downside_volatility: downside_volatility(returns),
            sharpe: sharpe_ratio(returns),
            calmar: calmar_ratio(annual_return, max_drawdown),
            annual_return,
            annual_volatility: annualized_volatility(returns),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Compound per-bar returns into a cumulative growth curve.
pub fn cumulative_curve(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0_f64, |acc, r| {
            *acc *= 1.0 + r;
            Some(*acc)
        })
        .collect()
}

/// Drawdown at each bar: cumulative / running_max - 1.
///
/// The running maximum starts at the first cumulative value.
pub fn drawdown_series(returns: &[f64]) -> Vec<f64> {
    let curve = cumulative_curve(returns);
    let mut peak = f64::NEG_INFINITY;
    curve
        .iter()
        .map(|&c| {
            peak = peak.max(c);
            if peak > 0.0 {
                c / peak - 1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Largest peak-to-trough decline as a negative fraction (0.0 when none).
pub fn max_drawdown(returns: &[f64]) -> f64 {
    drawdown_series(returns)
        .into_iter()
        .fold(0.0_f64, f64::min)
}

/// Historical VaR at `confidence` (e.g. 0.95 -> 5th percentile of returns).
pub fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    percentile(returns, (1.0 - confidence) * 100.0)
}

/// Sample standard deviation of the negative returns only.
pub fn downside_volatility(returns: &[f64]) -> f64 {
    let negative: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
    std_dev(&negative)
}

/// Unannualized Sharpe ratio: mean / std. 0.0 when the std is zero.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    let std = std_dev(returns);
    if std < 1e-15 {
        return 0.0;
    }
    mean_f64(returns) / std
}

/// (1 + mean)^252 - 1.
pub fn annualized_return(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    (1.0 + mean_f64(returns)).powf(TRADING_DAYS_PER_YEAR) - 1.0
}

/// std * sqrt(252).
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    std_dev(returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// |annual_return / max_drawdown|, 0.0 when there was no drawdown.
pub fn calmar_ratio(annual_return: f64, max_drawdown: f64) -> f64 {
    if max_drawdown == 0.0 {
        return 0.0;
    }
    (annual_return / max_drawdown).abs()
}
