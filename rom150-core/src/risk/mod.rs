//! Risk management — position sizing and stop bookkeeping.
//!
//! - `sizer`: risk-fraction share sizing
//! - `stop_loss`: static stop a fixed distance below the SMA
//! - `trailing`: ATR trailing stop armed by a profit threshold
//! - `ratchet`: stop level that may only rise

pub mod ratchet;
pub mod sizer;
pub mod stop_loss;
pub mod trailing;

pub use ratchet::Ratchet;
pub use sizer::PositionSizer;
pub use stop_loss::StopLossManager;
pub use trailing::TrailingStopManager;
