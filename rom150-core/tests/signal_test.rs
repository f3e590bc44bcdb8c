//! Integration tests for entry and exit signal detection.
//!
//! Tests:
//! 1. Cross / retest band edges at the reference thresholds.
//! 2. Price history is informational: crosses fire without it.
//! 3. Exit priority and stop bookkeeping across a held position.

use rom150_core::risk::{StopLossManager, TrailingStopManager};
use rom150_core::signals::{EntrySignal, EntrySignalDetector, ExitReason, ExitSignalDetector};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn entry_detector() -> EntrySignalDetector {
    EntrySignalDetector::new(0.01, 0.03, 0.04)
}

fn exit_detector() -> ExitSignalDetector {
    ExitSignalDetector::new(StopLossManager::new(0.015), TrailingStopManager::new(0.15, 2.0))
}

// ──────────────────────────────────────────────
// 1. Band edges
// ──────────────────────────────────────────────

#[test]
fn cross_band_is_open_below_closed_above() {
    let d = entry_detector();
    assert_eq!(d.detect_signal("AAPL", 100.0, 100.0), None);
    assert_eq!(d.detect_signal("AAPL", 100.01, 100.0), Some(EntrySignal::Cross));
    assert_eq!(d.detect_signal("AAPL", 101.0, 100.0), Some(EntrySignal::Cross));
    assert_eq!(d.detect_signal("AAPL", 101.5, 100.0), None);
}

#[test]
fn retest_band_is_closed_on_both_ends() {
    let d = entry_detector();
    assert_eq!(d.detect_signal("AAPL", 103.0, 100.0), Some(EntrySignal::Retest));
    assert_eq!(d.detect_signal("AAPL", 103.5, 100.0), Some(EntrySignal::Retest));
    assert_eq!(d.detect_signal("AAPL", 104.0, 100.0), Some(EntrySignal::Retest));
    assert_eq!(d.detect_signal("AAPL", 104.5, 100.0), None);
    assert_eq!(d.detect_signal("AAPL", 102.5, 100.0), None);
}

#[test]
fn below_sma_or_bad_sma_never_signals() {
    let d = entry_detector();
    assert_eq!(d.detect_signal("AAPL", 99.0, 100.0), None);
    assert_eq!(d.detect_signal("AAPL", 100.0, 0.0), None);
    assert_eq!(d.detect_signal("AAPL", 100.0, -5.0), None);
    assert_eq!(d.detect_signal("AAPL", 100.0, f64::NAN), None);
}

// ──────────────────────────────────────────────
// 2. Price history
// ──────────────────────────────────────────────

#[test]
fn cross_fires_whether_or_not_price_came_from_below() {
    let mut d = entry_detector();
    assert_eq!(d.crossed_from_below("AAPL", 100.0), None);
    assert_eq!(d.detect_signal("AAPL", 100.5, 100.0), Some(EntrySignal::Cross));

    d.update_price_history("AAPL", 100.8);
    assert_eq!(d.crossed_from_below("AAPL", 100.0), Some(false));
    assert_eq!(d.detect_signal("AAPL", 100.5, 100.0), Some(EntrySignal::Cross));

    d.update_price_history("AAPL", 99.0);
    assert_eq!(d.crossed_from_below("AAPL", 100.0), Some(true));

    d.clear_history("AAPL");
    assert_eq!(d.previous_price("AAPL"), None);
}

// ──────────────────────────────────────────────
// 3. Exit lifecycle
// ──────────────────────────────────────────────

#[test]
fn first_check_only_arms_the_static_stop() {
    let mut d = exit_detector();
    // No stop yet, so even a price far below the SMA holds on the first check.
    assert_eq!(d.check_exit_conditions("AAPL", 90.0, 100.0, Some(100.0), Some(1.0)), None);
    assert_eq!(d.stop_loss().get_stop_price("AAPL"), Some(98.5));
    let reason = d.check_exit_conditions("AAPL", 90.0, 100.0, Some(100.0), Some(1.0));
    assert_eq!(reason, Some(ExitReason::StaticStop { stop_price: 98.5 }));
}

#[test]
fn missing_sma_holds_and_leaves_state_untouched() {
    let mut d = exit_detector();
    d.stop_loss_mut().update_stop_price("AAPL", 100.0);
    assert_eq!(d.check_exit_conditions("AAPL", 50.0, 100.0, None, Some(1.0)), None);
    assert_eq!(d.stop_loss().get_stop_price("AAPL"), Some(98.5));
}

#[test]
fn static_stop_reported_when_both_breached() {
    let mut d = exit_detector();
    // Arm trailing at +30%: stop 130 - 2 × 1 = 128.
    d.check_exit_conditions("AAPL", 130.0, 100.0, Some(124.0), Some(1.0));
    assert!(d.trailing().is_activated("AAPL"));
    let static_stop = d.stop_loss().get_stop_price("AAPL").unwrap();

    // 100 breaches both 122.14 (static) and 128 (trailing).
    let reason = d.check_exit_conditions("AAPL", 100.0, 100.0, Some(124.0), Some(1.0));
    assert_eq!(reason, Some(ExitReason::StaticStop { stop_price: static_stop }));
    assert_eq!(reason.unwrap().to_string(), "Stop Loss ($122.14)");
}

#[test]
fn non_positive_atr_skips_trailing() {
    let mut d = exit_detector();
    d.check_exit_conditions("AAPL", 130.0, 100.0, Some(100.0), Some(0.0));
    assert!(!d.trailing().is_activated("AAPL"));
    d.check_exit_conditions("AAPL", 130.0, 100.0, Some(100.0), None);
    assert!(!d.trailing().is_activated("AAPL"));
}

#[test]
fn cleanup_resets_both_stops() {
    let mut d = exit_detector();
    d.check_exit_conditions("AAPL", 130.0, 100.0, Some(100.0), Some(1.0));
    d.cleanup_symbol("AAPL");
    assert!(d.stop_loss().get_stop_price("AAPL").is_none());
    assert!(!d.trailing().is_activated("AAPL"));
}
