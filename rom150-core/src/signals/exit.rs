//! Exit checks for an open long position.
//!
//! Order per step:
//! 1. No SMA value → hold.
//! 2. Existing static stop breached → exit (static stop wins over trailing).
//! 3. Refresh the static stop from the current SMA.
//! 4. With a positive ATR, advance the trailing stop; breached → exit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::risk::{StopLossManager, TrailingStopManager};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExitReason {
    StaticStop { stop_price: f64 },
    TrailingStop { stop_price: f64 },
}

impl ExitReason {
    pub fn stop_price(&self) -> f64 {
        match self {
            ExitReason::StaticStop { stop_price } | ExitReason::TrailingStop { stop_price } => {
                *stop_price
            }
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StaticStop { stop_price } => write!(f, "Stop Loss (${stop_price:.2})"),
            ExitReason::TrailingStop { stop_price } => {
                write!(f, "Trailing Stop (${stop_price:.2})")
            }
        }
    }
}

/// Owns the static and trailing stop managers.
#[derive(Debug, Clone)]
pub struct ExitSignalDetector {
    stop_loss: StopLossManager,
    trailing: TrailingStopManager,
}

impl ExitSignalDetector {
    pub fn new(stop_loss: StopLossManager, trailing: TrailingStopManager) -> Self {
        Self {
            stop_loss,
            trailing,
        }
    }

    pub fn check_exit_conditions(
        &mut self,
        symbol: &str,
        current_price: f64,
        entry_price: f64,
        sma_value: Option<f64>,
        atr_value: Option<f64>,
    ) -> Option<ExitReason> {
        let sma_value = sma_value?;

        if let Some(stop_price) = self.stop_loss.get_stop_price(symbol) {
            if current_price < stop_price {
                return Some(ExitReason::StaticStop { stop_price });
            }
        }

        self.stop_loss.update_stop_price(symbol, sma_value);

        if let Some(atr) = atr_value.filter(|a| *a > 0.0) {
            if let Some(stop_price) = self.trailing.update(symbol, current_price, entry_price, atr)
            {
                if current_price < stop_price {
                    return Some(ExitReason::TrailingStop { stop_price });
                }
            }
        }

        None
    }

    /// Drop all stop state for `symbol` after it is closed.
    pub fn cleanup_symbol(&mut self, symbol: &str) {
        self.stop_loss.remove_stop(symbol);
        self.trailing.remove_trailing_stop(symbol);
    }

    pub fn stop_loss(&self) -> &StopLossManager {
        &self.stop_loss
    }

    pub fn stop_loss_mut(&mut self) -> &mut StopLossManager {
        &mut self.stop_loss
    }

    pub fn trailing(&self) -> &TrailingStopManager {
        &self.trailing
    }
}
