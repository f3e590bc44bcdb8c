//! Static stop: a fixed percentage below the current SMA, per symbol.
//!
//! `update_stop_price` overwrites on every call, so the stop follows the SMA
//! down as well as up.

use std::collections::HashMap;

use crate::domain::Symbol;

#[derive(Debug, Clone)]
pub struct StopLossManager {
    stop_percentage: f64,
    stops: HashMap<Symbol, f64>,
}

impl StopLossManager {
    pub fn new(stop_percentage: f64) -> Self {
        Self {
            stop_percentage,
            stops: HashMap::new(),
        }
    }

    pub fn calculate_stop_price(&self, sma_value: f64) -> f64 {
        sma_value * (1.0 - self.stop_percentage)
    }

    pub fn update_stop_price(&mut self, symbol: &str, sma_value: f64) {
        let stop = self.calculate_stop_price(sma_value);
        self.stops.insert(symbol.to_string(), stop);
    }

    pub fn get_stop_price(&self, symbol: &str) -> Option<f64> {
        self.stops.get(symbol).copied()
    }

    pub fn remove_stop(&mut self, symbol: &str) {
        self.stops.remove(symbol);
    }
}
