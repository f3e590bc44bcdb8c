//! Order intents — what the strategy asks the host to execute.
//!
//! The core never talks to a broker. It emits fire-and-forget market order
//! intents keyed by symbol with a signed share quantity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Why the order was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderTag {
    Entry,
    Exit,
}

/// A market order request. Positive quantity buys, negative sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub symbol: Symbol,
    pub quantity: i64,
    pub tag: OrderTag,
}

impl OrderIntent {
    pub fn market_buy(symbol: impl Into<Symbol>, shares: i64) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: shares.abs(),
            tag: OrderTag::Entry,
        }
    }

    pub fn market_sell(symbol: impl Into<Symbol>, shares: i64) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: -shares.abs(),
            tag: OrderTag::Exit,
        }
    }

    pub fn side(&self) -> OrderSide {
        if self.quantity >= 0 {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buy_is_positive_sell_is_negative() {
        let buy = OrderIntent::market_buy("MSFT", 10);
        let sell = OrderIntent::market_sell("MSFT", 10);
        assert_eq!(buy.quantity, 10);
        assert_eq!(buy.side(), OrderSide::Buy);
        assert_eq!(sell.quantity, -10);
        assert_eq!(sell.side(), OrderSide::Sell);
        assert_eq!(sell.tag, OrderTag::Exit);
    }

    #[test]
    fn side_serializes_uppercase() {
        let json = serde_json::to_string(&OrderSide::Sell).unwrap();
        assert_eq!(json, "\"SELL\"");
    }
}
