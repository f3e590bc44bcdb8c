//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over the trailing `period` bars.
//! First valid value after `period` bars.

use std::collections::VecDeque;

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            window: VecDeque::with_capacity(period + 1),
            sum: 0.0,
            name: format!("sma_{period}"),
        }
    }

    /// Push a close price. NaN closes are ignored (void bar).
    pub fn push(&mut self, close: f64) -> Option<f64> {
        if close.is_nan() {
            return self.value();
        }
        self.window.push_back(close);
        self.sum += close;
        if self.window.len() > self.period {
            if let Some(leaving) = self.window.pop_front() {
                self.sum -= leaving;
            }
        }
        self.value()
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn update(&mut self, bar: &Bar) -> Option<f64> {
        self.push(bar.close)
    }

    fn value(&self) -> Option<f64> {
        (self.window.len() == self.period).then(|| self.sum / self.period as f64)
    }
}
