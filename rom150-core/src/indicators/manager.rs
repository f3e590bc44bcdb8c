//! Per-symbol indicator bookkeeping.
//!
//! Each tracked symbol owns an SMA, an ATR and a short history of SMA values
//! for the slope check. State is created when the symbol enters the tracked
//! universe and dropped when it leaves.

use std::collections::{BTreeMap, VecDeque};

use super::{Atr, Indicator, Sma};
use crate::domain::{Bar, Symbol};

#[derive(Debug, Clone)]
struct SymbolIndicators {
    sma: Sma,
    atr: Atr,
    /// Most recent SMA values, oldest first, at most `slope_lookback + 1` long.
    sma_history: VecDeque<f64>,
}

/// Rolling SMA / ATR / SMA-slope per tracked symbol.
#[derive(Debug, Clone)]
pub struct IndicatorManager {
    sma_period: usize,
    atr_period: usize,
    slope_lookback: usize,
    symbols: BTreeMap<Symbol, SymbolIndicators>,
}

impl IndicatorManager {
    pub fn new(sma_period: usize, atr_period: usize, slope_lookback: usize) -> Self {
        Self {
            sma_period,
            atr_period,
            slope_lookback,
            symbols: BTreeMap::new(),
        }
    }

    /// Start tracking `symbol`. Already-tracked symbols keep their state.
    pub fn add_indicators(&mut self, symbol: &str) {
        let (sma_period, atr_period, capacity) =
            (self.sma_period, self.atr_period, self.slope_lookback + 1);
        self.symbols
            .entry(symbol.to_string())
            .or_insert_with(|| SymbolIndicators {
                sma: Sma::new(sma_period),
                atr: Atr::new(atr_period),
                sma_history: VecDeque::with_capacity(capacity),
            });
    }

    pub fn remove_indicators(&mut self, symbol: &str) {
        self.symbols.remove(symbol);
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains_key(symbol)
    }

    /// Feed one bar. Bars for untracked symbols are ignored.
    pub fn update(&mut self, bar: &Bar) {
        let max_history = self.slope_lookback + 1;
        let Some(state) = self.symbols.get_mut(&bar.symbol) else {
            return;
        };
        if bar.is_void() {
            return;
        }
        state.atr.update(bar);
        if let Some(sma) = state.sma.update(bar) {
            state.sma_history.push_back(sma);
            while state.sma_history.len() > max_history {
                state.sma_history.pop_front();
            }
        }
    }

    pub fn get_sma_value(&self, symbol: &str) -> Option<f64> {
        self.symbols.get(symbol).and_then(|s| s.sma.value())
    }

    pub fn get_atr_value(&self, symbol: &str) -> Option<f64> {
        self.symbols.get(symbol).and_then(|s| s.atr.value())
    }

    /// Both SMA and ATR have a value.
    pub fn are_indicators_ready(&self, symbol: &str) -> bool {
        self.symbols
            .get(symbol)
            .is_some_and(|s| s.sma.is_ready() && s.atr.is_ready())
    }

    /// Current SMA strictly above the SMA `slope_lookback` steps ago.
    /// False until enough SMA history exists.
    pub fn is_sma_slope_positive(&self, symbol: &str) -> bool {
        let Some(state) = self.symbols.get(symbol) else {
            return false;
        };
        if state.sma_history.len() <= self.slope_lookback {
            return false;
        }
        match (state.sma_history.front(), state.sma_history.back()) {
            (Some(past), Some(current)) => current > past,
            _ => false,
        }
    }

    /// Tracked symbols in sorted order.
    pub fn get_all_symbols(&self) -> Vec<Symbol> {
        self.symbols.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn bars_for(symbol: &str, closes: &[f64]) -> Vec<Bar> {
        make_bars(closes)
            .into_iter()
            .map(|mut b| {
                b.symbol = symbol.to_string();
                b
            })
            .collect()
    }

    #[test]
    fn untracked_symbol_has_no_values() {
        let mut mgr = IndicatorManager::new(3, 2, 2);
        for bar in bars_for("AAPL", &[1.0, 2.0, 3.0, 4.0]) {
            mgr.update(&bar);
        }
        assert_eq!(mgr.get_sma_value("AAPL"), None);
        assert!(!mgr.are_indicators_ready("AAPL"));
    }

    #[test]
    fn ready_after_both_indicators_warm() {
        let mut mgr = IndicatorManager::new(3, 3, 2);
        mgr.add_indicators("AAPL");
        let bars = bars_for("AAPL", &[10.0, 11.0, 12.0, 13.0]);
        for bar in &bars[..3] {
            mgr.update(bar);
        }
        // SMA ready after 3 bars, ATR needs 4 (first bar has no true range)
        assert_eq!(mgr.get_sma_value("AAPL"), Some(11.0));
        assert_eq!(mgr.get_atr_value("AAPL"), None);
        assert!(!mgr.are_indicators_ready("AAPL"));

        mgr.update(&bars[3]);
        assert!(mgr.are_indicators_ready("AAPL"));
    }

    #[test]
    fn slope_compares_against_lookback() {
        let mut mgr = IndicatorManager::new(1, 1, 2);
        mgr.add_indicators("AAPL");
        let bars = bars_for("AAPL", &[10.0, 11.0, 12.0, 11.5]);
        mgr.update(&bars[0]);
        mgr.update(&bars[1]);
        // Only two SMA values; lookback 2 needs three.
        assert!(!mgr.is_sma_slope_positive("AAPL"));
        mgr.update(&bars[2]);
        assert!(mgr.is_sma_slope_positive("AAPL")); // 12 > 10
        mgr.update(&bars[3]);
        assert!(mgr.is_sma_slope_positive("AAPL")); // 11.5 > 11
    }

    #[test]
    fn slope_not_positive_when_falling() {
        let mut mgr = IndicatorManager::new(1, 1, 1);
        mgr.add_indicators("AAPL");
        for bar in bars_for("AAPL", &[12.0, 11.0]) {
            mgr.update(&bar);
        }
        assert!(!mgr.is_sma_slope_positive("AAPL"));
    }

    #[test]
    fn remove_drops_state_and_readd_starts_fresh() {
        let mut mgr = IndicatorManager::new(1, 1, 1);
        mgr.add_indicators("AAPL");
        mgr.update(&bars_for("AAPL", &[10.0])[0]);
        assert_eq!(mgr.get_sma_value("AAPL"), Some(10.0));

        mgr.remove_indicators("AAPL");
        assert!(!mgr.contains("AAPL"));
        mgr.add_indicators("AAPL");
        assert_eq!(mgr.get_sma_value("AAPL"), None);
    }

    #[test]
    fn symbols_are_sorted() {
        let mut mgr = IndicatorManager::new(1, 1, 1);
        for s in ["MSFT", "AAPL", "NVDA"] {
            mgr.add_indicators(s);
        }
        assert_eq!(mgr.get_all_symbols(), vec!["AAPL", "MSFT", "NVDA"]);
        assert_eq!(mgr.len(), 3);
    }
}
