//! Streaming indicators and the per-symbol indicator manager.
//!
//! Indicators are updated once per step with that step's bar and expose the
//! latest value. Nothing looks ahead: the value after `update(bar_t)` depends
//! only on bars up to and including `bar_t`.

pub mod atr;
pub mod manager;
pub mod sma;

pub use atr::Atr;
pub use manager::IndicatorManager;
pub use sma::Sma;

use crate::domain::Bar;

/// A rolling indicator fed one bar at a time.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_150", "atr_14").
    fn name(&self) -> &str;

    /// Number of bars consumed before the first valid value.
    fn lookback(&self) -> usize;

    /// Feed the next bar and return the latest value, if ready.
    fn update(&mut self, bar: &Bar) -> Option<f64>;

    /// Latest value, `None` while warming up.
    fn value(&self) -> Option<f64>;

    fn is_ready(&self) -> bool {
        self.value().is_some()
    }
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev_close (or close for first bar), high = max(open,close) + 1.0,
/// low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
