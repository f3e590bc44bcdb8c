//! Bar loading for the host loop.
//!
//! Bars come from one CSV file per symbol (`<dir>/<SYMBOL>.csv`) or from a
//! deterministic synthetic random walk. CSV columns:
//! `date,open,high,low,close,volume[,market_cap]`. A `market_cap` column
//! enables dynamic universe selection.

use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use rom150_core::domain::Bar;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data file for '{symbol}' at {path} (use --synthetic for synthetic data)")]
    Missing { symbol: String, path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: row {row} is not a usable bar: {reason}")]
    BadRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    #[error("no bars for '{symbol}'")]
    Empty { symbol: String },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    #[serde(default)]
    market_cap: Option<f64>,
}

/// All bars of one symbol, date-ordered.
#[derive(Debug, Clone)]
pub struct SymbolSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub market_caps: BTreeMap<NaiveDate, f64>,
    pub synthetic: bool,
}

impl SymbolSeries {
    pub fn has_market_caps(&self) -> bool {
        !self.market_caps.is_empty()
    }
}

/// Load `<dir>/<SYMBOL>.csv` for every symbol, in parallel.
pub fn load_dir(dir: &Path, symbols: &[String]) -> Result<Vec<SymbolSeries>, LoadError> {
    symbols
        .par_iter()
        .map(|symbol| {
            let path = dir.join(format!("{symbol}.csv"));
            if !path.exists() {
                return Err(LoadError::Missing {
                    symbol: symbol.clone(),
                    path,
                });
            }
            load_csv(&path, symbol)
        })
        .collect()
}

/// Parse one symbol's CSV file. Rows are sorted by date and duplicates keep
/// the last occurrence.
pub fn load_csv(path: &Path, symbol: &str) -> Result<SymbolSeries, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut by_date: BTreeMap<NaiveDate, (Bar, Option<f64>)> = BTreeMap::new();
    for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(csv_err)?;
        if !(row.volume.is_finite() && row.volume >= 0.0 && row.volume.fract() == 0.0) {
            return Err(LoadError::BadRow {
                path: path.to_path_buf(),
                row: i + 1,
                reason: format!("invalid volume {}", row.volume),
            });
        }
        let bar = Bar {
            symbol: symbol.to_string(),
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume as u64,
        };
        if !bar.is_sane() {
            return Err(LoadError::BadRow {
                path: path.to_path_buf(),
                row: i + 1,
                reason: "OHLC out of order or non-positive".into(),
            });
        }
        by_date.insert(row.date, (bar, row.market_cap));
    }

    if by_date.is_empty() {
        return Err(LoadError::Empty {
            symbol: symbol.to_string(),
        });
    }

    let mut market_caps = BTreeMap::new();
    let bars = by_date
        .into_iter()
        .map(|(date, (bar, cap))| {
            if let Some(cap) = cap {
                market_caps.insert(date, cap);
            }
            bar
        })
        .collect();

    Ok(SymbolSeries {
        symbol: symbol.to_string(),
        bars,
        market_caps,
        synthetic: false,
    })
}

/// Generate synthetic bars for every symbol, in parallel.
pub fn synthetic_series(symbols: &[String], start: NaiveDate, end: NaiveDate) -> Vec<SymbolSeries> {
    symbols
        .par_iter()
        .map(|symbol| SymbolSeries {
            symbol: symbol.clone(),
            bars: generate_synthetic_bars(symbol, start, end),
            market_caps: BTreeMap::new(),
            synthetic: true,
        })
        .collect()
}

/// Weekday random walk from 100.0, seeded from the symbol name.
pub fn generate_synthetic_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        // Slight upward drift so trend entries occur.
        let daily_return: f64 = rng.gen_range(-0.025..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);

        bars.push(Bar {
            symbol: symbol.to_string(),
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}
