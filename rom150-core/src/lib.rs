//! Rom150 Core — decision engine for a 150-day SMA trend-following strategy.
//!
//! The crate decides, once per trading day, what to buy and sell:
//! - Domain types (bars, order intents, portfolio snapshots)
//! - Streaming SMA / ATR indicators per tracked symbol
//! - Market-regime filter on a benchmark's own SMA
//! - Cross / retest entry signals and static / trailing-stop exits
//! - Risk-fraction position sizing and position gating
//! - Universe selection by dollar volume and market cap
//! - The per-step orchestrator tying them together
//!
//! It never talks to a broker or a data feed. The host supplies bars and a
//! portfolio snapshot, and executes the order intents the step returns.

pub mod config;
pub mod domain;
pub mod engine;
pub mod filter;
pub mod indicators;
pub mod portfolio;
pub mod risk;
pub mod signals;
pub mod universe;

pub use config::{ConfigError, StrategyParams};
pub use engine::{Orchestrator, StepInput, StepReport, StepStatus};
