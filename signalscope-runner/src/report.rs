//! Report persistence: human-readable text and JSON.
//!
//! Percentages are printed to 2 decimal places, ratios to 4. Both sinks
//! create the target directory and return the written path.

use crate::analysis::macd::RECENT_CROSS_BARS;
use crate::analysis::AnalysisReport;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Destination for a finished analysis report.
pub trait ReportSink {
    /// Persist `report` under `name` (extension added by the sink).
    fn write(&self, report: &AnalysisReport, name: &str) -> Result<PathBuf, ReportError>;
}

pub struct TextReportWriter {
    dir: PathBuf,
}

impl TextReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReportSink for TextReportWriter {
    fn write(&self, report: &AnalysisReport, name: &str) -> Result<PathBuf, ReportError> {
        let path = prepare(&self.dir, name, "txt")?;
        fs::write(&path, render_text(report))?;
        tracing::info!(path = %path.display(), "wrote text report");
        Ok(path)
    }
}

pub struct JsonReportWriter {
    dir: PathBuf,
}

impl JsonReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReportSink for JsonReportWriter {
    fn write(&self, report: &AnalysisReport, name: &str) -> Result<PathBuf, ReportError> {
        let path = prepare(&self.dir, name, "json")?;
        fs::write(&path, serde_json::to_string_pretty(report)?)?;
        tracing::info!(path = %path.display(), "wrote JSON report");
        Ok(path)
    }
}

fn prepare(dir: &Path, name: &str, extension: &str) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir)?;
    Ok(dir.join(format!("{name}.{extension}")))
}

fn pct(value: f64) -> String {
    format!("{:+.2}%", value * 100.0)
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

/// Render the text report.
pub fn render_text(report: &AnalysisReport) -> String {
    let rule = "=".repeat(72);
    let mut out = format!(
        "{rule}\nTechnical Analysis Report: {}\n{rule}\n\
         Generated:    {}\n\
         Period:       {} to {}\n\
         Trading days: {}\n\
         Config hash:  {}\n\
         Data hash:    {}\n",
        report.symbol,
        report.generated_at.format("%Y-%m-%d %H:%M:%S"),
        report.period.start,
        report.period.end,
        report.period.bars,
        short(&report.config_hash),
        short(&report.dataset_hash),
    );

    out.push_str(&section("Basic Statistics"));
    let b = &report.basic;
    out.push_str(&format!("Current price:     {:.2}\n", b.price.current));
    out.push_str(&format!("Max price:         {:.2}\n", b.price.max));
    out.push_str(&format!("Min price:         {:.2}\n", b.price.min));
    out.push_str(&format!("Mean price:        {:.2}\n", b.price.mean));
    out.push_str(&format!("Total return:      {}\n", pct(b.returns.total_return)));
    out.push_str(&format!("Mean daily return: {}\n", pct(b.returns.mean)));
    out.push_str(&format!("Return volatility: {:.2}%\n", b.returns.std * 100.0));
    out.push_str(&format!("Best day:          {}\n", pct(b.returns.max)));
    out.push_str(&format!("Worst day:         {}\n", pct(b.returns.min)));
    out.push_str(&format!(
        "Up/down days:      {}/{}\n",
        b.returns.positive_days, b.returns.negative_days
    ));
    out.push_str(&format!("Win rate:          {:.2}%\n", b.returns.win_rate * 100.0));
    out.push_str(&format!("Mean volume:       {:.0}\n", b.volume.mean));

    out.push_str(&section("Risk Metrics"));
    let r = &report.risk;
    out.push_str(&format!("Max drawdown:        {}\n", pct(r.max_drawdown)));
    out.push_str(&format!("VaR (95%):           {}\n", pct(r.var_95)));
    out.push_str(&format!("VaR (99%):           {}\n", pct(r.var_99)));
    out.push_str(&format!(
        "Downside volatility: {:.2}%\n",
        r.downside_volatility * 100.0
    ));
    out.push_str(&format!("Sharpe ratio:        {:.4}\n", r.sharpe));
    out.push_str(&format!("Calmar ratio:        {:.4}\n", r.calmar));
    out.push_str(&format!("Annual return:       {}\n", pct(r.annual_return)));
    out.push_str(&format!(
        "Annual volatility:   {:.2}%\n",
        r.annual_volatility * 100.0
    ));

    out.push_str(&section("Moving Averages"));
    let ma = &report.moving_averages;
    out.push_str(&format!(
        "Trend: {} (close above {:.2}% of MAs)\n",
        ma.trend,
        ma.above_ratio * 100.0
    ));
    for p in &ma.positions {
        out.push_str(&format!("  {:<8} {:>12.4}  {}\n", p.name, p.value, pct(p.diff)));
    }
    out.push_str("Cross frequency:\n");
    for row in &ma.crosses {
        out.push_str(&format!(
            "  {:<16} golden {:>3}  death {:>3}  every {:.2} bars\n",
            row.pair, row.golden, row.death, row.avg_interval
        ));
    }

    out.push_str(&section("Multi-Timeframe Trend"));
    for tf in &report.multi_timeframe.timeframes {
        let macd = tf.macd.as_ref().map_or_else(
            || "MACD n/a".to_string(),
            |m| format!("MACD {:.4} / {:.4} ({})", m.macd, m.signal, m.trend),
        );
        out.push_str(&format!(
            "  {:<8} {:>4} bars  close {:>10.2}  change {:>8}  above {:>6.2}% of {} MAs  {}  {}\n",
            tf.timeframe.to_string(),
            tf.bars,
            tf.close,
            pct(tf.change),
            tf.above_ratio * 100.0,
            tf.defined_mas,
            tf.trend,
            macd
        ));
    }

    out.push_str(&section("Bollinger Bands"));
    let bb = &report.bollinger;
    let position = bb
        .status
        .position
        .map_or_else(|| "n/a".to_string(), |p| p.to_string());
    let width = bb
        .status
        .width
        .map_or_else(|| "n/a".to_string(), |w| w.to_string());
    out.push_str(&format!("Position: {position}, width {width}\n"));
    out.push_str(&format!(
        "Upper/middle/lower: {} / {} / {}\n",
        opt(bb.status.upper),
        opt(bb.status.middle),
        opt(bb.status.lower)
    ));
    out.push_str(&format!(
        "Breakouts: {} above upper, {} below lower\n",
        bb.upper_breakouts, bb.lower_breakouts
    ));
    out.push_str(&format!(
        "Squeezes: {} ({} completed)\n",
        bb.squeezes.len(),
        bb.completed_squeezes()
    ));
    for sq in &bb.squeezes {
        let outcome = match &sq.outcome {
            Some(o) => format!("{} {}", o.direction, pct(o.change)),
            None if sq.completed => "pending".to_string(),
            None => "open".to_string(),
        };
        out.push_str(&format!(
            "  {} to {} ({} bars): {outcome}\n",
            sq.start_date, sq.end_date, sq.duration
        ));
    }

    out.push_str(&section("KDJ / RSI"));
    let osc = &report.oscillators;
    out.push_str(&format!(
        "KDJ: K {} D {} J {}\n",
        opt(osc.kdj.k),
        opt(osc.kdj.d),
        opt(osc.kdj.j)
    ));
    out.push_str(&format!(
        "KDJ crosses: {} golden, {} death\n",
        osc.kdj.golden_crosses, osc.kdj.death_crosses
    ));
    out.push_str(&format!(
        "Last {} bars: KDJ overbought {} oversold {}, RSI overbought {} oversold {}\n",
        osc.analysis_days,
        osc.kdj.overbought_entries,
        osc.kdj.oversold_entries,
        osc.rsi.overbought_entries,
        osc.rsi.oversold_entries
    ));
    let ob = &osc.kdj.overbought_returns;
    out.push_str(&format!(
        "After KDJ overbought ({} days): {} trades, avg {}, win rate {:.2}%\n",
        report.holding_days,
        ob.count,
        pct(ob.avg_return),
        ob.win_rate * 100.0
    ));
    out.push_str(&format!(
        "RSI {} midline crosses: {} bullish, {} bearish\n",
        opt(osc.rsi.value),
        osc.rsi.midline_bullish,
        osc.rsi.midline_bearish
    ));
    out.push_str(&format!(
        "Agreement: {} bars both overbought, {} both oversold\n",
        osc.both_overbought, osc.both_oversold
    ));

    out.push_str(&section("MACD"));
    let m = &report.macd;
    match &m.status {
        Some(s) => {
            out.push_str(&format!(
                "MACD {:.4} signal {:.4} histogram {:.4}\n",
                s.macd, s.signal, s.histogram
            ));
            out.push_str(&format!("Trend: {}, momentum {}\n", s.trend, s.momentum));
        }
        None => out.push_str("MACD: n/a\n"),
    }
    out.push_str(&format!(
        "Crosses: {} golden, {} death; zero line {} up, {} down\n",
        m.golden_crosses, m.death_crosses, m.zero_cross_up, m.zero_cross_down
    ));
    if m.recent_golden {
        out.push_str(&format!(
            "Golden cross within the last {RECENT_CROSS_BARS} bars\n"
        ));
    }
    if m.recent_death {
        out.push_str(&format!(
            "Death cross within the last {RECENT_CROSS_BARS} bars\n"
        ));
    }

    out.push_str(&section("Signal Performance"));
    out.push_str(&format!("Holding period: {} bars\n", report.holding_days));
    for named in &report.signal_performance {
        let p = &named.performance;
        out.push_str(&format!(
            "  {:<24} signals {:>3}  trades {:>3}  avg {:>8}  win {:>7.2}%  max {:>8}  min {:>8}\n",
            named.name,
            p.total_signals,
            p.count,
            pct(p.avg_return),
            p.win_rate * 100.0,
            pct(p.max_return),
            pct(p.min_return)
        ));
    }

    out
}

fn section(title: &str) -> String {
    format!("\n{:-^72}\n", format!(" {title} "))
}

fn short(hash: &str) -> &str {
    hash.get(..16).unwrap_or(hash)
}
