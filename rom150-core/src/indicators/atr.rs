//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! The first bar has no previous close and contributes no true range.
//! Wilder smoothing (alpha = 1/period), seeded with the mean of the first
//! `period` true ranges.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    prev_close: Option<f64>,
    seed: Vec<f64>,
    value: Option<f64>,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            prev_close: None,
            seed: Vec::with_capacity(period),
            value: None,
            name: format!("atr_{period}"),
        }
    }
}

/// True range of `bar` given the previous close.
pub fn true_range(bar: &Bar, prev_close: f64) -> f64 {
    (bar.high - bar.low)
        .max((bar.high - prev_close).abs())
        .max((bar.low - prev_close).abs())
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period + 1
    }

    fn update(&mut self, bar: &Bar) -> Option<f64> {
        if bar.is_void() {
            return self.value;
        }
        let Some(prev_close) = self.prev_close.replace(bar.close) else {
            return None;
        };
        let tr = true_range(bar, prev_close);

        self.value = match self.value {
            Some(prev) => {
                let alpha = 1.0 / self.period as f64;
                Some(alpha * tr + (1.0 - alpha) * prev)
            }
            None => {
                self.seed.push(tr);
                (self.seed.len() == self.period)
                    .then(|| self.seed.iter().sum::<f64>() / self.period as f64)
            }
        };
        self.value
    }

    fn value(&self) -> Option<f64> {
        self.value
    }
}
