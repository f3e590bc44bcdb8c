//! Entry signals on the SMA.
//!
//! With `distance = (price - sma) / sma`:
//! - `0 < distance <= cross_threshold` → cross
//! - `retest_min <= distance <= retest_max` → retest
//! - anything else → no signal
//!
//! The last close per symbol is kept so callers can tell whether a cross came
//! from below the SMA. It does not gate the signal: any distance inside the
//! cross band fires.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::domain::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySignal {
    /// Price just above the SMA, within the tight cross band.
    Cross,
    /// Price pulled back into the wider band above the SMA.
    Retest,
}

impl fmt::Display for EntrySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntrySignal::Cross => write!(f, "cross"),
            EntrySignal::Retest => write!(f, "retest"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntrySignalDetector {
    cross_threshold: f64,
    retest_min: f64,
    retest_max: f64,
    previous_prices: HashMap<Symbol, f64>,
}

impl EntrySignalDetector {
    pub fn new(cross_threshold: f64, retest_min: f64, retest_max: f64) -> Self {
        Self {
            cross_threshold,
            retest_min,
            retest_max,
            previous_prices: HashMap::new(),
        }
    }

    /// Classify `current_price` against `sma_value`.
    pub fn detect_signal(
        &self,
        _symbol: &str,
        current_price: f64,
        sma_value: f64,
    ) -> Option<EntrySignal> {
        if sma_value.is_nan() || sma_value <= 0.0 || current_price.is_nan() {
            return None;
        }
        let distance = (current_price - sma_value) / sma_value;

        if distance > 0.0 && distance <= self.cross_threshold {
            return Some(EntrySignal::Cross);
        }
        if distance >= self.retest_min && distance <= self.retest_max {
            return Some(EntrySignal::Retest);
        }
        None
    }

    /// Whether the previous close was below `sma_value`. `None` without history.
    pub fn crossed_from_below(&self, symbol: &str, sma_value: f64) -> Option<bool> {
        self.previous_prices.get(symbol).map(|&prev| prev < sma_value)
    }

    pub fn update_price_history(&mut self, symbol: &str, price: f64) {
        self.previous_prices.insert(symbol.to_string(), price);
    }

    pub fn previous_price(&self, symbol: &str) -> Option<f64> {
        self.previous_prices.get(symbol).copied()
    }

    pub fn clear_history(&mut self, symbol: &str) {
        self.previous_prices.remove(symbol);
    }
}
