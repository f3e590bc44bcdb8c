//! Portfolio snapshot — the host's view of holdings, cash and equity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Symbol;

/// A held position as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub quantity: i64,
    pub average_price: f64,
}

impl Holding {
    pub fn is_invested(&self) -> bool {
        self.quantity != 0
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity as f64 * (price - self.average_price)
    }
}

/// Host-supplied portfolio state at the start of a step.
///
/// `BTreeMap` keeps iteration over holdings deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub holdings: BTreeMap<Symbol, Holding>,
    pub cash: f64,
    pub total_value: f64,
}

impl PortfolioSnapshot {
    /// An all-cash portfolio.
    pub fn new(cash: f64) -> Self {
        Self {
            holdings: BTreeMap::new(),
            cash,
            total_value: cash,
        }
    }

    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.get(symbol).filter(|h| h.is_invested())
    }

    pub fn is_invested(&self, symbol: &str) -> bool {
        self.holding(symbol).is_some()
    }

    /// Number of symbols with a non-zero position.
    pub fn invested_count(&self) -> usize {
        self.holdings.values().filter(|h| h.is_invested()).count()
    }

    pub fn invested_symbols(&self) -> Vec<Symbol> {
        self.holdings
            .iter()
            .filter(|(_, h)| h.is_invested())
            .map(|(s, _)| s.clone())
            .collect()
    }

    /// Apply a market fill at `price`. Buys average into the holding, a sell
    /// that flattens the holding removes it. Cash moves by the fill value;
    /// total value is unchanged because the fill is at market.
    pub fn apply_fill(&mut self, symbol: &str, quantity: i64, price: f64) {
        if quantity == 0 {
            return;
        }
        self.cash -= quantity as f64 * price;

        let entry = self.holdings.entry(symbol.to_string()).or_insert(Holding {
            quantity: 0,
            average_price: 0.0,
        });
        let new_qty = entry.quantity + quantity;
        if new_qty == 0 {
            self.holdings.remove(symbol);
            return;
        }
        if quantity > 0 && entry.quantity >= 0 {
            let cost = entry.quantity as f64 * entry.average_price + quantity as f64 * price;
            entry.average_price = cost / new_qty as f64;
        }
        entry.quantity = new_qty;
    }

    /// Recompute total value from closing prices. Symbols without a price are
    /// valued at their average price.
    pub fn mark_to_market(&mut self, prices: &BTreeMap<Symbol, f64>) {
        let positions: f64 = self
            .holdings
            .iter()
            .map(|(sym, h)| h.market_value(prices.get(sym).copied().unwrap_or(h.average_price)))
            .sum();
        self.total_value = self.cash + positions;
    }
}
