//! Paper ledger — fills order intents at the close so holdings, cash and
//! equity flow into the next step. No costs, no slippage.

use rom150_core::domain::{OrderIntent, PortfolioSnapshot, Symbol};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct PaperLedger {
    portfolio: PortfolioSnapshot,
    last_close: BTreeMap<Symbol, f64>,
    fills: usize,
}

impl PaperLedger {
    pub fn new(cash: f64) -> Self {
        Self {
            portfolio: PortfolioSnapshot::new(cash),
            last_close: BTreeMap::new(),
            fills: 0,
        }
    }

    pub fn snapshot(&self) -> &PortfolioSnapshot {
        &self.portfolio
    }

    /// Fill every intent at its symbol's close, then mark to market.
    /// Intents for symbols without a close are dropped.
    pub fn settle(&mut self, orders: &[OrderIntent], closes: &BTreeMap<Symbol, f64>) {
        for order in orders {
            match closes.get(&order.symbol) {
                Some(&price) => {
                    self.portfolio.apply_fill(&order.symbol, order.quantity, price);
                    self.fills += 1;
                }
                None => warn!(symbol = %order.symbol, "no close for order, dropped"),
            }
        }
        self.mark(closes);
    }

    /// Revalue holdings. Symbols missing from `closes` keep their last mark.
    pub fn mark(&mut self, closes: &BTreeMap<Symbol, f64>) {
        self.last_close
            .extend(closes.iter().map(|(s, p)| (s.clone(), *p)));
        self.portfolio.mark_to_market(&self.last_close);
    }

    pub fn fills(&self) -> usize {
        self.fills
    }

    pub fn total_value(&self) -> f64 {
        self.portfolio.total_value
    }
}
