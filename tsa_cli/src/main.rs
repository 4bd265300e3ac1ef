//! Command line front end for the derived-series engine.
//!
//! Loads a price file, narrows it to the requested tickers and dates, then
//! prints either the table summary or one analysis report as JSON.

mod csv_source;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use tsa_core::analyzer::NoticeLevel;
use tsa_core::common::time::parse_date;
use tsa_core::{
    AnalysisConfig, AnalysisView, ColumnKey, FetchRequest, Session, TickerList, TsaError,
};

use crate::csv_source::CsvPriceSource;

#[derive(Parser)]
#[command(author, version, about = "Time series analysis of daily stock prices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summary statistics of the loaded table
    Describe(CommonArgs),
    /// Close price lines, one per ticker
    Close(CommonArgs),
    /// Histograms of close prices
    Distribution(CommonArgs),
    /// Histograms of daily returns
    ReturnDistribution(CommonArgs),
    /// Close price with its rolling mean and volatility
    MovingAverage(CommonArgs),
    /// Bollinger bands per ticker
    Bollinger(CommonArgs),
    /// Trend, seasonal and residual components per ticker
    Seasonal(CommonArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Price file (flat or three-header-row layout)
    #[arg(short, long)]
    data: PathBuf,

    /// Comma-separated list of tickers
    #[arg(short, long, default_value = "AAPL,NVDA")]
    tickers: String,

    /// Start date (YYYY-MM-DD), inclusive
    #[arg(long, default_value = "2019-01-01")]
    start: String,

    /// End date (YYYY-MM-DD), exclusive
    #[arg(long, default_value = "2024-12-31")]
    end: String,

    /// Columns to keep, e.g. "Close:AAPL,Open:AAPL" or "Close,Volume"
    #[arg(short, long)]
    columns: Option<String>,

    /// JSON file with analysis parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rolling window in rows, overrides the config file
    #[arg(long)]
    window: Option<usize>,

    /// Seasonal period in rows, overrides the config file
    #[arg(long)]
    period: Option<usize>,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let cli = Cli::parse();
    let (view, args) = match cli.command {
        Commands::Describe(args) => (None, args),
        Commands::Close(args) => (Some(AnalysisView::ClosePrices), args),
        Commands::Distribution(args) => (Some(AnalysisView::PriceDistribution), args),
        Commands::ReturnDistribution(args) => (Some(AnalysisView::ReturnDistribution), args),
        Commands::MovingAverage(args) => (Some(AnalysisView::MovingAverage), args),
        Commands::Bollinger(args) => (Some(AnalysisView::Bollinger), args),
        Commands::Seasonal(args) => (Some(AnalysisView::Seasonal), args),
    };

    let session = load_session(&args)?;
    let output = match view {
        None => serde_json::to_string_pretty(&session.describe())?,
        Some(view) => match session.analyze(view) {
            Ok(report) => {
                for notice in &report.notices {
                    match notice.level {
                        NoticeLevel::Info => info!(ticker = ?notice.ticker, "{}", notice.message),
                        NoticeLevel::Warning => warn!(ticker = ?notice.ticker, "{}", notice.message),
                    }
                }
                serde_json::to_string_pretty(&report)?
            }
            Err(TsaError::EmptyInput { .. }) => {
                println!("No data available");
                return Ok(());
            }
            Err(e) => {
                error!(code = %e.errcode(), %view, "analysis failed");
                return Err(e).with_context(|| format!("{} analysis failed", view));
            }
        },
    };
    println!("{}", output);
    Ok(())
}

fn load_session(args: &CommonArgs) -> Result<Session> {
    let mut conf: HashMap<String, serde_json::Value> = match &args.config {
        Some(path) => {
            info!("Loading analysis config from: {}", path.display());
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text).context("config must be a JSON object")?
        }
        None => HashMap::new(),
    };
    if let Some(window) = args.window {
        conf.insert("window".to_string(), window.into());
    }
    if let Some(period) = args.period {
        conf.insert("period".to_string(), period.into());
    }
    let config = AnalysisConfig::new(Some(conf))?;

    let request = FetchRequest::new(
        TickerList::parse(&args.tickers),
        parse_date(&args.start)?,
        parse_date(&args.end)?,
    );

    let mut session = Session::new(config);
    let source = CsvPriceSource::new(&args.data);
    session.fetch(&source, &request)?;

    if let Some(columns) = &args.columns {
        let keys = columns
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(ColumnKey::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        session.filter_columns(&keys);
    }
    Ok(session)
}
