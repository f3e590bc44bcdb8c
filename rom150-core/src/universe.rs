//! Universe selection — coarse filter of tradable symbols.
//!
//! Candidates below the market-cap floor (or without one) are dropped, the
//! rest are ranked by dollar volume and the top `universe_size` kept.
//! Diffing two selections yields the added/removed notifications the
//! orchestrator consumes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::Symbol;

/// One row of coarse market data for selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoarseCandidate {
    pub symbol: Symbol,
    pub price: f64,
    pub dollar_volume: f64,
    pub market_cap: Option<f64>,
}

/// Added/removed symbols between two selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseChanges {
    pub added: Vec<Symbol>,
    pub removed: Vec<Symbol>,
}

impl UniverseChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct UniverseSelector {
    universe_size: usize,
    minimum_market_cap: f64,
    /// Never selected (the regime benchmark).
    excluded: BTreeSet<Symbol>,
}

impl UniverseSelector {
    pub fn new(universe_size: usize, minimum_market_cap: f64) -> Self {
        Self {
            universe_size,
            minimum_market_cap,
            excluded: BTreeSet::new(),
        }
    }

    pub fn excluding(mut self, symbol: impl Into<Symbol>) -> Self {
        self.excluded.insert(symbol.into());
        self
    }

    /// Top symbols by dollar volume among those passing the market-cap floor.
    /// Ties break on symbol so the result is deterministic.
    pub fn select(&self, candidates: &[CoarseCandidate]) -> Vec<Symbol> {
        let mut eligible: Vec<&CoarseCandidate> = candidates
            .iter()
            .filter(|c| !self.excluded.contains(&c.symbol))
            .filter(|c| c.price > 0.0 && c.dollar_volume.is_finite())
            .filter(|c| c.market_cap.is_some_and(|cap| cap >= self.minimum_market_cap))
            .collect();

        eligible.sort_by(|a, b| {
            b.dollar_volume
                .total_cmp(&a.dollar_volume)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });

        eligible
            .into_iter()
            .take(self.universe_size)
            .map(|c| c.symbol.clone())
            .collect()
    }
}

/// Currently selected symbols.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    members: BTreeSet<Symbol>,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace membership with `selected` and report the difference.
    pub fn apply<I, S>(&mut self, selected: I) -> UniverseChanges
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let next: BTreeSet<Symbol> = selected.into_iter().map(Into::into).collect();
        let changes = UniverseChanges {
            added: next.difference(&self.members).cloned().collect(),
            removed: self.members.difference(&next).cloned().collect(),
        };
        self.members = next;
        changes
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.members.contains(symbol)
    }

    pub fn members(&self) -> impl Iterator<Item = &Symbol> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
