//! ATR trailing stop, armed once unrealized profit reaches a threshold.
//!
//! Candidate stop = close - ATR * multiplier. Before activation no stop
//! exists. After activation the stop ratchets: it follows the candidate up
//! and never moves down.

use std::collections::HashMap;

use super::Ratchet;
use crate::domain::Symbol;

#[derive(Debug, Clone)]
pub struct TrailingStopManager {
    profit_threshold: f64,
    atr_multiplier: f64,
    /// Present only for activated symbols.
    stops: HashMap<Symbol, Ratchet>,
}

impl TrailingStopManager {
    pub fn new(profit_threshold: f64, atr_multiplier: f64) -> Self {
        Self {
            profit_threshold,
            atr_multiplier,
            stops: HashMap::new(),
        }
    }

    /// Advance the trailing stop for `symbol` and return it, or `None` while
    /// the profit threshold has not been reached.
    pub fn update(
        &mut self,
        symbol: &str,
        current_price: f64,
        entry_price: f64,
        atr_value: f64,
    ) -> Option<f64> {
        let candidate = current_price - self.atr_multiplier * atr_value;

        if let Some(ratchet) = self.stops.get_mut(symbol) {
            return Some(ratchet.apply(candidate));
        }

        if entry_price.is_nan() || entry_price <= 0.0 {
            return None;
        }
        let profit_pct = (current_price - entry_price) / entry_price;
        if profit_pct >= self.profit_threshold && !candidate.is_nan() {
            self.stops
                .insert(symbol.to_string(), Ratchet::with_level(candidate));
            return Some(candidate);
        }
        None
    }

    pub fn is_activated(&self, symbol: &str) -> bool {
        self.stops.contains_key(symbol)
    }

    pub fn get_trailing_stop(&self, symbol: &str) -> Option<f64> {
        self.stops.get(symbol).and_then(Ratchet::level)
    }

    pub fn remove_trailing_stop(&mut self, symbol: &str) {
        self.stops.remove(symbol);
    }
}
