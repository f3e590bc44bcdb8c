//! Host loop — replays daily bars through the orchestrator.
//!
//! Per trading day:
//! 1. Reselect the universe when market caps are available
//! 2. Step the orchestrator with the day's bars and the ledger snapshot
//! 3. Fill the emitted intents at the close and mark to market
//!
//! The loop starts `warmup_days` trading days before the start date so the
//! indicators are ready when decisions begin.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use rom150_core::domain::{Bar, Symbol};
use rom150_core::engine::{Orchestrator, StepInput, StepStatus};
use rom150_core::universe::{CoarseCandidate, Universe, UniverseSelector};
use rom150_core::StrategyParams;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::data::SymbolSeries;
use crate::paper::PaperLedger;
use crate::report::{Dated, RunReport};

type DayBars = BTreeMap<Symbol, Bar>;

pub fn run(params: &StrategyParams, series: &[SymbolSeries]) -> Result<RunReport> {
    let mut orch = Orchestrator::new(params.clone())?;

    let mut calendar: BTreeMap<NaiveDate, DayBars> = BTreeMap::new();
    for s in series {
        for bar in s.bars.iter().filter(|b| b.date <= params.end_date) {
            calendar
                .entry(bar.date)
                .or_default()
                .insert(s.symbol.clone(), bar.clone());
        }
    }
    let Some(first) = calendar.keys().position(|d| *d >= params.start_date) else {
        bail!(
            "no bars between {} and {}",
            params.start_date,
            params.end_date
        );
    };
    let begin = first.saturating_sub(params.warmup_days);
    if first - begin < params.warmup_days {
        info!(
            available = first - begin,
            wanted = params.warmup_days,
            "not enough history before start, warmup extends into the run"
        );
    }

    let dynamic = series.iter().any(SymbolSeries::has_market_caps);
    let selector = UniverseSelector::new(params.universe_size, params.minimum_market_cap)
        .excluding(params.benchmark.clone());
    let mut universe = Universe::new();
    if !dynamic {
        let changes = universe.apply(
            series
                .iter()
                .map(|s| s.symbol.clone())
                .filter(|s| *s != params.benchmark),
        );
        orch.on_universe_changed(&changes);
    }

    let mut ledger = PaperLedger::new(params.starting_cash);
    let mut orders = Vec::new();
    let mut entries = Vec::new();
    let mut exits = Vec::new();
    let mut trading_days = 0;

    for (date, bars) in calendar.iter().skip(begin) {
        if dynamic {
            reselect(&mut orch, &mut universe, &selector, &ledger, series, *date, bars);
        }

        let input = StepInput {
            date: *date,
            bars: bars.clone(),
            portfolio: ledger.snapshot().clone(),
        };
        let report = orch.step(&input);
        if *date >= params.start_date {
            trading_days += 1;
        } else if report.status != StepStatus::WarmingUp {
            debug!(%date, status = ?report.status, "decision step before start date");
        }

        let closes: BTreeMap<Symbol, f64> =
            bars.iter().map(|(s, b)| (s.clone(), b.close)).collect();
        ledger.settle(&report.orders, &closes);

        let date = report.date;
        orders.extend(report.orders.into_iter().map(|event| Dated { date, event }));
        entries.extend(report.entries.into_iter().map(|event| Dated { date, event }));
        exits.extend(report.exits.into_iter().map(|event| Dated { date, event }));
    }

    let final_value = ledger.total_value();
    Ok(RunReport {
        params_fingerprint: params.fingerprint(),
        start: params.start_date,
        end: params.end_date,
        symbols: series.iter().map(|s| s.symbol.clone()).collect(),
        synthetic: series.iter().any(|s| s.synthetic),
        starting_cash: params.starting_cash,
        final_value,
        total_return_pct: (final_value / params.starting_cash - 1.0) * 100.0,
        trading_days,
        steps_processed: orch.steps_processed(),
        blocked_days: orch.blocked_days(),
        fills: ledger.fills(),
        orders,
        entries,
        exits,
    })
}

/// Select from the day's candidates. Held symbols stay in the universe so
/// their exits keep being evaluated.
fn reselect(
    orch: &mut Orchestrator,
    universe: &mut Universe,
    selector: &UniverseSelector,
    ledger: &PaperLedger,
    series: &[SymbolSeries],
    date: NaiveDate,
    bars: &DayBars,
) {
    let candidates: Vec<CoarseCandidate> = series
        .iter()
        .filter_map(|s| {
            let bar = bars.get(&s.symbol)?;
            Some(CoarseCandidate {
                symbol: s.symbol.clone(),
                price: bar.close,
                dollar_volume: bar.dollar_volume(),
                market_cap: s.market_caps.get(&date).copied(),
            })
        })
        .collect();
    if candidates.iter().all(|c| c.market_cap.is_none()) {
        return;
    }

    let mut selected = selector.select(&candidates);
    for held in ledger.snapshot().invested_symbols() {
        if !selected.contains(&held) {
            selected.push(held);
        }
    }
    let changes = universe.apply(selected);
    if !changes.is_empty() {
        info!(
            %date,
            added = changes.added.len(),
            removed = changes.removed.len(),
            "universe changed"
        );
        orch.on_universe_changed(&changes);
    }
}
