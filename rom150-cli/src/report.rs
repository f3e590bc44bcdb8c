//! Run report — JSON artifact and console summary.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rom150_core::domain::OrderIntent;
use rom150_core::engine::{EntryEvent, ExitEvent};
use serde::Serialize;
use std::path::Path;

/// An event stamped with the step date it was decided on.
#[derive(Debug, Clone, Serialize)]
pub struct Dated<T> {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub event: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub params_fingerprint: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub symbols: Vec<String>,
    pub synthetic: bool,
    pub starting_cash: f64,
    pub final_value: f64,
    pub total_return_pct: f64,
    /// Steps inside [start, end].
    pub trading_days: usize,
    pub steps_processed: usize,
    pub blocked_days: usize,
    pub fills: usize,
    pub orders: Vec<Dated<OrderIntent>>,
    pub entries: Vec<Dated<EntryEvent>>,
    pub exits: Vec<Dated<ExitEvent>>,
}

impl RunReport {
    pub fn realized_pnl(&self) -> f64 {
        self.exits.iter().map(|e| e.event.pnl).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize run report")
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    pub fn print_summary(&self) {
        println!("=== Rom150 Run ===");
        println!("Period:          {} to {}", self.start, self.end);
        println!("Symbols:         {}", self.symbols.join(" "));
        if self.synthetic {
            println!("Data:            SYNTHETIC");
        }
        println!("Params:          {}", &self.params_fingerprint[..16.min(self.params_fingerprint.len())]);
        println!("Starting cash:   ${:.2}", self.starting_cash);
        println!("Final value:     ${:.2}", self.final_value);
        println!("Total return:    {:.2}%", self.total_return_pct);
        println!("Realized P&L:    ${:.2}", self.realized_pnl());
        println!("Entries / exits: {} / {}", self.entries.len(), self.exits.len());
        println!(
            "Days traded:     {} of {} ({} blocked by regime filter)",
            self.steps_processed, self.trading_days, self.blocked_days
        );
    }
}
