//! Signal detection — entry patterns against the SMA and exit checks.
//!
//! Entry detection is a pure function of price and SMA. Exit detection
//! composes the static and trailing stop managers, which it owns.

pub mod entry;
pub mod exit;

pub use entry::{EntrySignal, EntrySignalDetector};
pub use exit::{ExitReason, ExitSignalDetector};
