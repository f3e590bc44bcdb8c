//! Market-regime filter — gates the whole step on broad-market trend.
//!
//! When the regime is not bullish the orchestrator skips exits and entries
//! for the step and counts it as a blocked day.

use crate::domain::Bar;
use crate::indicators::{Indicator, Sma};

/// Trait for regime filters.
///
/// # Architecture invariant
/// Filters see market data only. They never read portfolio state.
pub trait RegimeFilter: Send + Sync {
    /// Human-readable name (e.g., "benchmark_sma").
    fn name(&self) -> &str;

    /// Feed one bar. Filters ignore symbols they do not follow.
    fn update(&mut self, bar: &Bar);

    /// Whether trading is allowed this step.
    fn is_bullish(&self) -> bool;

    /// Latest (price, reference level) pair, if the filter has one.
    fn snapshot(&self) -> Option<(f64, f64)> {
        None
    }
}

/// Bullish while the benchmark closes strictly above its own SMA.
///
/// Not bullish until the SMA has a value.
#[derive(Debug, Clone)]
pub struct BenchmarkRegimeFilter {
    symbol: String,
    sma: Sma,
    last_close: Option<f64>,
}

impl BenchmarkRegimeFilter {
    pub fn new(symbol: impl Into<String>, period: usize) -> Self {
        Self {
            symbol: symbol.into(),
            sma: Sma::new(period),
            last_close: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl RegimeFilter for BenchmarkRegimeFilter {
    fn name(&self) -> &str {
        "benchmark_sma"
    }

    fn update(&mut self, bar: &Bar) {
        if bar.symbol != self.symbol || bar.is_void() {
            return;
        }
        self.last_close = Some(bar.close);
        self.sma.update(bar);
    }

    fn is_bullish(&self) -> bool {
        matches!(self.snapshot(), Some((close, sma)) if close > sma)
    }

    fn snapshot(&self) -> Option<(f64, f64)> {
        Some((self.last_close?, self.sma.value()?))
    }
}

/// Pass-through filter: every step is tradable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegimeFilter;

impl RegimeFilter for NoRegimeFilter {
    fn name(&self) -> &str {
        "no_filter"
    }

    fn update(&mut self, _bar: &Bar) {}

    fn is_bullish(&self) -> bool {
        true
    }
}
