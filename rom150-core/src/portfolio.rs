//! Position gating: concurrent-position cap and pyramiding cap.

use std::collections::HashMap;

use crate::domain::Symbol;

/// Per-symbol entry bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionRecord {
    pub entry_count: u32,
    pub is_open: bool,
    pub last_entry_price: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct PortfolioManager {
    max_positions: usize,
    max_entries_per_symbol: u32,
    records: HashMap<Symbol, PositionRecord>,
}

impl PortfolioManager {
    pub fn new(max_positions: usize, max_entries_per_symbol: u32) -> Self {
        Self {
            max_positions,
            max_entries_per_symbol,
            records: HashMap::new(),
        }
    }

    pub fn initialize_symbol(&mut self, symbol: &str) {
        self.records.entry(symbol.to_string()).or_default();
    }

    pub fn remove_symbol(&mut self, symbol: &str) {
        self.records.remove(symbol);
    }

    pub fn can_open_new_position(&self, current_open_count: usize) -> bool {
        current_open_count < self.max_positions
    }

    pub fn can_add_to_position(&self, symbol: &str) -> bool {
        self.get_entry_count(symbol) < self.max_entries_per_symbol
    }

    pub fn record_entry(&mut self, symbol: &str, price: f64) {
        let record = self.records.entry(symbol.to_string()).or_default();
        record.entry_count += 1;
        record.is_open = true;
        record.last_entry_price = Some(price);
    }

    pub fn get_entry_count(&self, symbol: &str) -> u32 {
        self.records.get(symbol).map_or(0, |r| r.entry_count)
    }

    /// Reset tracking after a full exit.
    pub fn clear_position(&mut self, symbol: &str) {
        if let Some(record) = self.records.get_mut(symbol) {
            *record = PositionRecord::default();
        }
    }

    pub fn record(&self, symbol: &str) -> Option<&PositionRecord> {
        self.records.get(symbol)
    }

    /// Symbols with at least one recorded entry since their last exit.
    pub fn open_count(&self) -> usize {
        self.records.values().filter(|r| r.is_open).count()
    }

    pub fn max_positions(&self) -> usize {
        self.max_positions
    }
}
