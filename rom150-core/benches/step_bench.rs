//! Criterion benchmarks for the decision hot paths.
//!
//! Benchmarks:
//! 1. Orchestrator step over a full universe
//! 2. Indicator manager updates

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use chrono::NaiveDate;

use rom150_core::domain::{Bar, PortfolioSnapshot};
use rom150_core::engine::{Orchestrator, StepInput};
use rom150_core::filter::NoRegimeFilter;
use rom150_core::indicators::IndicatorManager;
use rom150_core::universe::UniverseChanges;
use rom150_core::StrategyParams;

// ── Helpers ──────────────────────────────────────────────────────────

fn close_at(symbol_idx: usize, day: usize) -> f64 {
    100.0 + symbol_idx as f64 + (day as f64 * 0.1 + symbol_idx as f64).sin() * 10.0
}

fn make_steps(n_symbols: usize, n_days: usize) -> Vec<StepInput> {
    let base = NaiveDate::from_ymd_opt(2016, 1, 4).unwrap();
    (0..n_days)
        .map(|day| {
            let date = base + chrono::Duration::days(day as i64);
            (0..n_symbols).fold(
                StepInput::new(date, PortfolioSnapshot::new(100_000.0)),
                |input, s| {
                    let close = close_at(s, day);
                    input.with_bar(Bar {
                        symbol: format!("S{s:03}"),
                        date,
                        open: close - 0.3,
                        high: close + 1.5,
                        low: close - 1.5,
                        close,
                        volume: 1_000_000,
                    })
                },
            )
        })
        .collect()
}

fn make_orchestrator(n_symbols: usize) -> Orchestrator {
    let params = StrategyParams {
        warmup_days: 0,
        ..StrategyParams::default()
    };
    let mut orch = Orchestrator::with_regime_filter(params, Box::new(NoRegimeFilter))
        .expect("default params are valid");
    orch.on_universe_changed(&UniverseChanges {
        added: (0..n_symbols).map(|s| format!("S{s:03}")).collect(),
        removed: vec![],
    });
    orch
}

// ── 1. Orchestrator step ─────────────────────────────────────────────

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("orchestrator_step");
    for &n_symbols in &[10usize, 100] {
        let steps = make_steps(n_symbols, 300);
        group.bench_with_input(BenchmarkId::from_parameter(n_symbols), &steps, |b, steps| {
            b.iter(|| {
                let mut orch = make_orchestrator(n_symbols);
                for input in steps {
                    black_box(orch.step(input));
                }
            })
        });
    }
    group.finish();
}

// ── 2. Indicator updates ─────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let steps = make_steps(100, 300);
    c.bench_function("indicator_manager_100x300", |b| {
        b.iter(|| {
            let mut manager = IndicatorManager::new(150, 14, 5);
            for s in 0..100 {
                manager.add_indicators(&format!("S{s:03}"));
            }
            for input in &steps {
                for bar in input.bars.values() {
                    manager.update(bar);
                }
            }
            black_box(manager.get_sma_value("S000"))
        })
    });
}

criterion_group!(benches, bench_step, bench_indicators);
criterion_main!(benches);
