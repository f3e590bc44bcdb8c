//! Rom150 CLI — replay daily bars through the strategy.
//!
//! Commands:
//! - `run` — load bars (CSV directory or synthetic), step the strategy day by
//!   day against a paper ledger, print a summary and optionally write JSON
//! - `validate` — check a parameter file and print its fingerprint
//! - `params` — print the default parameters as TOML

mod data;
mod paper;
mod report;
mod runner;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rom150_core::StrategyParams;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rom150", about = "Rom150 — 150-day SMA trend-following strategy")]
struct Cli {
    /// Debug-level logging (overrides RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay daily bars through the strategy.
    Run {
        /// Path to a TOML parameter file. Missing keys use the defaults.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory holding one <SYMBOL>.csv per symbol.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Generate synthetic bars instead of reading files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Symbols to trade. Defaults to the configured test securities.
        #[arg(long, num_args = 1..)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Overrides the config.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Overrides the config.
        #[arg(long)]
        end: Option<String>,

        /// Write the JSON run report here.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate a parameter file and print its fingerprint.
    Validate {
        /// Path to a TOML parameter file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the default parameters as TOML.
    Params,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            data_dir,
            synthetic,
            symbols,
            start,
            end,
            output,
        } => run_cmd(config, data_dir, synthetic, symbols, start, end, output),
        Commands::Validate { config } => validate_cmd(config.as_deref()),
        Commands::Params => {
            print!("{}", StrategyParams::default().to_toml()?);
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays clean for summaries and TOML.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_params(config: Option<&Path>) -> Result<StrategyParams> {
    let params = match config {
        Some(path) => StrategyParams::from_file(path)?,
        None => StrategyParams::default(),
    };
    Ok(params)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn run_cmd(
    config: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    synthetic: bool,
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    if data_dir.is_some() && synthetic {
        bail!("--data-dir and --synthetic are mutually exclusive");
    }

    let mut params = load_params(config.as_deref())?;
    if let Some(s) = start.as_deref() {
        params.start_date = parse_date(s)?;
    }
    if let Some(s) = end.as_deref() {
        params.end_date = parse_date(s)?;
    }
    params.validate().context("invalid strategy parameters")?;

    let mut symbols = if symbols.is_empty() {
        params.test_securities.clone()
    } else {
        symbols
    };
    if !symbols.contains(&params.benchmark) {
        symbols.push(params.benchmark.clone());
    }

    let series = match (data_dir, synthetic) {
        (Some(dir), false) => data::load_dir(&dir, &symbols)?,
        (None, true) => {
            // Calendar-day padding so the warmup window has weekday bars.
            let padding = (params.warmup_days as i64 * 7) / 5 + 14;
            let from = params.start_date - chrono::Duration::days(padding);
            data::synthetic_series(&symbols, from, params.end_date)
        }
        _ => bail!("one of --data-dir or --synthetic is required"),
    };
    info!(symbols = series.len(), "bars loaded");

    let report = runner::run(&params, &series)?;
    report.print_summary();

    if let Some(path) = output {
        report.write_json(&path)?;
        println!("Report saved to: {}", path.display());
    }
    Ok(())
}

fn validate_cmd(config: Option<&Path>) -> Result<()> {
    let params = load_params(config)?;
    params.validate().context("invalid strategy parameters")?;
    println!("ok {}", params.fingerprint());
    Ok(())
}
