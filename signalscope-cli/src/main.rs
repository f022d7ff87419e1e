//! SignalScope CLI: analyze, batch, download and config commands.
//!
//! Commands:
//! - `analyze`: load one symbol, print a summary, write the report and chart overlay CSV
//! - `batch`: analyze several symbols in parallel, one line per symbol
//! - `download`: fetch daily bars from Yahoo Finance into the Parquet cache
//! - `config`: print the default analysis configuration as TOML

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use signalscope_core::data::{
    parse_date, CoverageResult, CsvProvider, DataProvider, DataSource, ParquetCache, YahooProvider,
};
use signalscope_core::AnalysisConfig;
use signalscope_runner::{
    analyze_series, load_series, overlays_for, run_batch, series_from_bars, AnalysisReport,
    ChartRenderer, CsvChartRenderer, JsonReportWriter, LoadOptions, ReportSink, TextReportWriter,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "signalscope",
    about = "SignalScope CLI: technical indicators, signals and statistics for daily bars"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one symbol and write its report and chart overlays.
    Analyze {
        /// Ticker symbol (e.g., SPY).
        symbol: String,

        /// Start date (YYYY-MM-DD or YYYYMMDD). Defaults to one year before the end.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD or YYYYMMDD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Path to a TOML analysis config. Defaults to built-in parameters.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read bars from a CSV file instead of the cache/provider.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Never touch the network; use cached data only.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Fall back to a deterministic synthetic series when no data is available.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,

        /// Output directory for reports and chart data. Defaults to ./output.
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// Also write the report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Analyze several symbols in parallel.
    Batch {
        /// Symbols to analyze (e.g., SPY QQQ AAPL).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD or YYYYMMDD). Defaults to one year before the end.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD or YYYYMMDD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Path to a TOML analysis config.
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        offline: bool,

        #[arg(long, default_value_t = false)]
        synthetic: bool,

        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,

        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// Also write each report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Download daily bars from Yahoo Finance and cache as Parquet.
    Download {
        /// Symbols to download.
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD or YYYYMMDD). Defaults to one year before the end.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD or YYYYMMDD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Force re-download even if cached.
        #[arg(long, default_value_t = false)]
        force: bool,

        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Print the default analysis configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            symbol,
            start,
            end,
            config,
            csv,
            offline,
            synthetic,
            cache_dir,
            output_dir,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            let (start, end) = date_range(start.as_deref(), end.as_deref())?;
            let opts = LoadOptions {
                start,
                end,
                offline,
                synthetic,
                force: false,
                min_bars: config.data.min_bars,
            };
            run_analyze(&symbol, csv.as_deref(), &cache_dir, &output_dir, json, &opts, &config)
        }
        Commands::Batch {
            symbols,
            start,
            end,
            config,
            offline,
            synthetic,
            cache_dir,
            output_dir,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            let (start, end) = date_range(start.as_deref(), end.as_deref())?;
            let opts = LoadOptions {
                start,
                end,
                offline,
                synthetic,
                force: false,
                min_bars: config.data.min_bars,
            };
            run_batch_cmd(&symbols, &cache_dir, &output_dir, json, &opts, &config)
        }
        Commands::Download {
            symbols,
            start,
            end,
            force,
            cache_dir,
        } => {
            let (start, end) = date_range(start.as_deref(), end.as_deref())?;
            run_download(&symbols, start, end, force, &cache_dir)
        }
        Commands::Config => {
            print!("{}", AnalysisConfig::default().to_toml_string()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn date_range(start: Option<&str>, end: Option<&str>) -> Result<(NaiveDate, NaiveDate)> {
    let end_date = match end {
        Some(s) => parse_date(s).with_context(|| format!("invalid end date '{s}'"))?,
        None => chrono::Local::now().date_naive(),
    };
    let start_date = match start {
        Some(s) => parse_date(s).with_context(|| format!("invalid start date '{s}'"))?,
        None => end_date - chrono::Duration::days(365),
    };
    if start_date > end_date {
        bail!("start date {start_date} is after end date {end_date}");
    }
    Ok((start_date, end_date))
}

fn run_analyze(
    symbol: &str,
    csv: Option<&Path>,
    cache_dir: &Path,
    output_dir: &Path,
    json: bool,
    opts: &LoadOptions,
    config: &AnalysisConfig,
) -> Result<()> {
    let (series, source) = match csv {
        Some(path) => {
            let bars = CsvProvider::new(path)
                .read_all()
                .with_context(|| format!("reading {}", path.display()))?;
            (series_from_bars(symbol, bars, opts)?, DataSource::CsvImport)
        }
        None => {
            let cache = ParquetCache::new(cache_dir);
            let provider = if opts.offline {
                None
            } else {
                Some(YahooProvider::new()?)
            };
            let provider_ref = provider.as_ref().map(|p| p as &dyn DataProvider);
            let loaded = load_series(symbol, &cache, provider_ref, opts)
                .with_context(|| format!("loading {symbol}"))?;
            (loaded.series, loaded.source)
        }
    };

    let report = analyze_series(&series, config);
    print_summary(&report, source);

    let name = format!("{symbol}_report");
    let text_path = TextReportWriter::new(output_dir).write(&report, &name)?;
    println!("Report saved to: {}", text_path.display());
    if json {
        let json_path = JsonReportWriter::new(output_dir).write(&report, &name)?;
        println!("JSON saved to:   {}", json_path.display());
    }

    let overlays = overlays_for(&series, config);
    let chart = CsvChartRenderer::new(output_dir).render(
        &series,
        &overlays,
        &format!("{symbol}_chart"),
    )?;
    println!(
        "Chart data saved to: {} ({} columns)",
        chart.path.display(),
        chart.columns.len()
    );

    Ok(())
}

fn run_batch_cmd(
    symbols: &[String],
    cache_dir: &Path,
    output_dir: &Path,
    json: bool,
    opts: &LoadOptions,
    config: &AnalysisConfig,
) -> Result<()> {
    let cache = ParquetCache::new(cache_dir);
    let provider = if opts.offline {
        None
    } else {
        Some(YahooProvider::new()?)
    };
    let provider_ref = provider.as_ref().map(|p| p as &dyn DataProvider);

    let outcomes = run_batch(symbols, &cache, provider_ref, opts, config);

    let text_writer = TextReportWriter::new(output_dir);
    let json_writer = JsonReportWriter::new(output_dir);
    let mut failed = 0;

    println!(
        "{:<8} {:<10} {:>6} {:>10} {:>10} {:>8}  Trend",
        "Symbol", "Source", "Bars", "Return", "Max DD", "Sharpe"
    );
    println!("{}", "-".repeat(72));
    for outcome in &outcomes {
        match &outcome.result {
            Ok((report, source)) => {
                println!(
                    "{:<8} {:<10} {:>6} {:>9.2}% {:>9.2}% {:>8.4}  {}",
                    outcome.symbol,
                    source.to_string(),
                    report.period.bars,
                    report.basic.returns.total_return * 100.0,
                    report.risk.max_drawdown * 100.0,
                    report.risk.sharpe,
                    report.moving_averages.trend
                );
                let name = format!("{}_report", outcome.symbol);
                text_writer.write(report, &name)?;
                if json {
                    json_writer.write(report, &name)?;
                }
            }
            Err(e) => {
                failed += 1;
                println!("{:<8} ERROR: {e}", outcome.symbol);
            }
        }
    }

    println!();
    println!("Reports saved to: {}", output_dir.display());
    if failed > 0 {
        eprintln!("{failed} of {} symbol(s) failed", outcomes.len());
        std::process::exit(1);
    }
    Ok(())
}

fn run_download(
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
    force: bool,
    cache_dir: &Path,
) -> Result<()> {
    let provider = YahooProvider::new()?;
    let cache = ParquetCache::new(cache_dir);
    let mut errors: Vec<(String, String)> = Vec::new();

    for symbol in symbols {
        if !force && cache.covers_range(symbol, start, end) == CoverageResult::FullyCovered {
            println!("{symbol}: cached, skipping");
            continue;
        }
        let result = provider
            .fetch(symbol, start, end)
            .and_then(|fetched| {
                cache.write(symbol, &fetched.bars, fetched.source)?;
                Ok(fetched.bars.len())
            });
        match result {
            Ok(count) => println!("{symbol}: {count} bars cached"),
            Err(e) => errors.push((symbol.clone(), e.to_string())),
        }
    }

    if !errors.is_empty() {
        for (sym, err) in &errors {
            eprintln!("Error for {sym}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn print_summary(report: &AnalysisReport, source: DataSource) {
    let fmt_opt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |x| format!("{x:.2}"));

    println!();
    println!("=== Analysis Result ===");
    println!("Symbol:         {}", report.symbol);
    println!(
        "Period:         {} to {}",
        report.period.start, report.period.end
    );
    println!("Bars:           {} ({source})", report.period.bars);
    println!("Last Close:     {:.2}", report.basic.price.current);
    println!();
    println!("--- Statistics ---");
    println!(
        "Total Return:   {:.2}%",
        report.basic.returns.total_return * 100.0
    );
    println!("Win Rate:       {:.2}%", report.basic.returns.win_rate * 100.0);
    println!("Annual Return:  {:.2}%", report.risk.annual_return * 100.0);
    println!("Annual Vol:     {:.2}%", report.risk.annual_volatility * 100.0);
    println!("Max Drawdown:   {:.2}%", report.risk.max_drawdown * 100.0);
    println!("VaR 95%:        {:.2}%", report.risk.var_95 * 100.0);
    println!("Sharpe:         {:.4}", report.risk.sharpe);
    println!("Calmar:         {:.4}", report.risk.calmar);
    println!();
    println!("--- Indicators ---");
    println!("MA Trend:       {}", report.moving_averages.trend);
    for tf in &report.multi_timeframe.timeframes {
        println!("{:<16}{}", format!("{} Trend:", capitalize(&tf.timeframe.to_string())), tf.trend);
    }
    println!("RSI:            {}", fmt_opt(report.oscillators.rsi.value));
    println!(
        "KDJ:            K {} / D {} / J {}",
        fmt_opt(report.oscillators.kdj.k),
        fmt_opt(report.oscillators.kdj.d),
        fmt_opt(report.oscillators.kdj.j)
    );
    match &report.bollinger.status.position {
        Some(position) => println!("Bollinger:      {position}"),
        None => println!("Bollinger:      n/a"),
    }
    match &report.macd.status {
        Some(status) => println!("MACD:           {} ({})", status.trend, status.momentum),
        None => println!("MACD:           n/a"),
    }
    if source == DataSource::Synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
