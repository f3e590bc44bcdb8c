//! Step input and output types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{Bar, OrderIntent, PortfolioSnapshot, Symbol};
use crate::signals::{EntrySignal, ExitReason};

/// Everything the host supplies for one trading day.
#[derive(Debug, Clone)]
pub struct StepInput {
    pub date: NaiveDate,
    /// Bars available this step. Symbols without a bar are skipped.
    pub bars: BTreeMap<Symbol, Bar>,
    pub portfolio: PortfolioSnapshot,
}

impl StepInput {
    pub fn new(date: NaiveDate, portfolio: PortfolioSnapshot) -> Self {
        Self {
            date,
            bars: BTreeMap::new(),
            portfolio,
        }
    }

    pub fn with_bar(mut self, bar: Bar) -> Self {
        self.bars.insert(bar.symbol.clone(), bar);
        self
    }

    pub fn close(&self, symbol: &str) -> Option<f64> {
        self.bars.get(symbol).map(|b| b.close)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Indicators still warming; no decisions made.
    WarmingUp,
    /// Regime filter not bullish; exits and entries skipped.
    Blocked,
    /// Exits and entries evaluated.
    Traded,
}

/// Lifecycle of a symbol as seen from one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPhase {
    Flat,
    Entering,
    Held,
    Exiting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryEvent {
    pub symbol: Symbol,
    pub signal: EntrySignal,
    pub price: f64,
    pub sma: f64,
    pub shares: i64,
    pub stop_price: f64,
    /// 1 for the initial entry, 2+ for pyramid adds.
    pub entry_number: u32,
    /// Dollar risk to the static stop.
    pub risk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitEvent {
    pub symbol: Symbol,
    pub reason: ExitReason,
    pub quantity: i64,
    pub price: f64,
    pub entry_price: f64,
    pub pnl: f64,
    pub pnl_pct: f64,
}

/// What the orchestrator decided for one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub date: NaiveDate,
    pub status: StepStatus,
    /// Exit orders first, then entries, in submission order.
    pub orders: Vec<OrderIntent>,
    pub exits: Vec<ExitEvent>,
    pub entries: Vec<EntryEvent>,
}

impl StepReport {
    pub fn idle(date: NaiveDate, status: StepStatus) -> Self {
        Self {
            date,
            status,
            orders: Vec::new(),
            exits: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.orders.is_empty()
    }

    /// Phase of `symbol` this step, given the portfolio the step started from.
    pub fn phase_of(&self, symbol: &str, before: &PortfolioSnapshot) -> SymbolPhase {
        if self.exits.iter().any(|e| e.symbol == symbol) {
            SymbolPhase::Exiting
        } else if self.entries.iter().any(|e| e.symbol == symbol) {
            SymbolPhase::Entering
        } else if before.is_invested(symbol) {
            SymbolPhase::Held
        } else {
            SymbolPhase::Flat
        }
    }
}
