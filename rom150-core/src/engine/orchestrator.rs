//! Orchestrator — one decision pass per trading day.
//!
//! Per step:
//! 1. Feed bars to the indicators and the regime filter
//! 2. Warmup gate
//! 3. Regime gate (not bullish → blocked day)
//! 4. Exits for held symbols
//! 5. Entries for eligible symbols
//! 6. Record closes for the entry detector
//!
//! The host's snapshot is copied into a projection at the start of the step.
//! Exits are assumed to fill at the close (cash credited, holding removed) and
//! entries debit cash, so later decisions in the same step see earlier ones.

use tracing::{debug, info};

use super::step::{EntryEvent, ExitEvent, StepInput, StepReport, StepStatus};
use super::warmup::WarmupState;
use crate::config::{ConfigError, StrategyParams};
use crate::domain::{OrderIntent, PortfolioSnapshot};
use crate::filter::{BenchmarkRegimeFilter, RegimeFilter};
use crate::indicators::IndicatorManager;
use crate::portfolio::PortfolioManager;
use crate::risk::{PositionSizer, StopLossManager, TrailingStopManager};
use crate::signals::{EntrySignal, EntrySignalDetector, ExitSignalDetector};
use crate::universe::UniverseChanges;

pub struct Orchestrator {
    params: StrategyParams,
    indicators: IndicatorManager,
    regime: Box<dyn RegimeFilter>,
    entry_detector: EntrySignalDetector,
    exit_detector: ExitSignalDetector,
    sizer: PositionSizer,
    portfolio_manager: PortfolioManager,
    warmup: WarmupState,
    regime_seen_bullish: bool,
    steps_processed: usize,
    blocked_days: usize,
}

impl Orchestrator {
    /// Validate `params` and build every manager, gated on the benchmark's
    /// own SMA.
    pub fn new(params: StrategyParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let regime = BenchmarkRegimeFilter::new(params.benchmark.clone(), params.sma_period);
        Self::with_regime_filter(params, Box::new(regime))
    }

    pub fn with_regime_filter(
        params: StrategyParams,
        regime: Box<dyn RegimeFilter>,
    ) -> Result<Self, ConfigError> {
        params.validate()?;

        let exit_detector = ExitSignalDetector::new(
            StopLossManager::new(params.stop_loss_percentage),
            TrailingStopManager::new(
                params.trailing_profit_threshold,
                params.trailing_atr_multiplier,
            ),
        );

        info!(
            start = %params.start_date,
            end = %params.end_date,
            cash = params.starting_cash,
            sma = params.sma_period,
            atr = params.atr_period,
            max_positions = params.max_positions,
            risk = params.risk_per_trade,
            regime = regime.name(),
            "strategy initialized"
        );

        Ok(Self {
            indicators: IndicatorManager::new(
                params.sma_period,
                params.atr_period,
                params.sma_slope_lookback,
            ),
            regime,
            entry_detector: EntrySignalDetector::new(
                params.cross_distance_threshold,
                params.retest_min_distance,
                params.retest_max_distance,
            ),
            exit_detector,
            sizer: PositionSizer::new(params.risk_per_trade),
            portfolio_manager: PortfolioManager::new(
                params.max_positions,
                params.max_entries_per_symbol,
            ),
            warmup: WarmupState::new(params.warmup_days),
            regime_seen_bullish: false,
            steps_processed: 0,
            blocked_days: 0,
            params,
        })
    }

    /// Start or stop tracking symbols as the universe changes.
    /// The benchmark is never tracked as a tradable symbol.
    pub fn on_universe_changed(&mut self, changes: &UniverseChanges) {
        for symbol in &changes.added {
            if *symbol == self.params.benchmark {
                continue;
            }
            self.indicators.add_indicators(symbol);
            self.portfolio_manager.initialize_symbol(symbol);
            info!(%symbol, "+ added to universe");
        }
        for symbol in &changes.removed {
            self.indicators.remove_indicators(symbol);
            self.portfolio_manager.remove_symbol(symbol);
            self.entry_detector.clear_history(symbol);
            info!(%symbol, "- removed from universe");
        }
    }

    pub fn step(&mut self, input: &StepInput) -> StepReport {
        for bar in input.bars.values() {
            self.regime.update(bar);
            self.indicators.update(bar);
        }

        if !self.warmup.is_warm() {
            self.warmup.process_step();
            debug!(
                date = %input.date,
                remaining = self.warmup.steps_until_warm(),
                "warming up"
            );
            return StepReport::idle(input.date, StepStatus::WarmingUp);
        }

        if !self.regime.is_bullish() {
            self.blocked_days += 1;
            debug!(date = %input.date, "regime filter not bullish, step skipped");
            return StepReport::idle(input.date, StepStatus::Blocked);
        }
        if !self.regime_seen_bullish {
            self.regime_seen_bullish = true;
            if let Some((price, level)) = self.regime.snapshot() {
                info!(date = %input.date, price, sma = level, "regime bullish");
            }
        }

        self.steps_processed += 1;
        if self.params.debug_interval > 0 && self.steps_processed % self.params.debug_interval == 0
        {
            info!(
                date = %input.date,
                open = input.portfolio.invested_count(),
                max = self.params.max_positions,
                blocked = self.blocked_days,
                "status"
            );
        }

        let mut report = StepReport::idle(input.date, StepStatus::Traded);
        let mut projected = input.portfolio.clone();

        self.process_exits(input, &mut projected, &mut report);
        self.process_entries(input, &mut projected, &mut report);
        self.update_price_history(input);

        report
    }

    fn process_exits(
        &mut self,
        input: &StepInput,
        projected: &mut PortfolioSnapshot,
        report: &mut StepReport,
    ) {
        for symbol in projected.invested_symbols() {
            let Some(price) = input.close(&symbol) else {
                continue;
            };
            let Some(holding) = projected.holding(&symbol).copied() else {
                continue;
            };
            if holding.quantity <= 0 {
                continue;
            }

            let reason = self.exit_detector.check_exit_conditions(
                &symbol,
                price,
                holding.average_price,
                self.indicators.get_sma_value(&symbol),
                self.indicators.get_atr_value(&symbol),
            );
            let Some(reason) = reason else {
                continue;
            };

            let pnl = holding.unrealized_pnl(price);
            let pnl_pct = if holding.average_price > 0.0 {
                (price - holding.average_price) / holding.average_price
            } else {
                0.0
            };
            info!(
                %symbol,
                %reason,
                quantity = holding.quantity,
                price,
                pnl,
                pnl_pct = pnl_pct * 100.0,
                "exit"
            );

            report
                .orders
                .push(OrderIntent::market_sell(symbol.clone(), holding.quantity));
            projected.apply_fill(&symbol, -holding.quantity, price);
            self.portfolio_manager.clear_position(&symbol);
            self.exit_detector.cleanup_symbol(&symbol);
            self.entry_detector.clear_history(&symbol);

            report.exits.push(ExitEvent {
                symbol,
                reason,
                quantity: holding.quantity,
                price,
                entry_price: holding.average_price,
                pnl,
                pnl_pct,
            });
        }
    }

    fn process_entries(
        &mut self,
        input: &StepInput,
        projected: &mut PortfolioSnapshot,
        report: &mut StepReport,
    ) {
        let mut open_count = projected.invested_count();
        if !self.portfolio_manager.can_open_new_position(open_count) {
            return;
        }

        for symbol in self.indicators.get_all_symbols() {
            if symbol == self.params.benchmark {
                continue;
            }
            let Some(price) = input.close(&symbol) else {
                continue;
            };

            let allowed = if projected.is_invested(&symbol) {
                self.portfolio_manager.can_add_to_position(&symbol)
            } else {
                self.portfolio_manager.can_open_new_position(open_count)
            };
            if !allowed || !self.indicators.are_indicators_ready(&symbol) {
                continue;
            }
            let Some(sma) = self.indicators.get_sma_value(&symbol) else {
                continue;
            };
            if sma <= 0.0 {
                continue;
            }
            if self.params.require_positive_sma_slope
                && !self.indicators.is_sma_slope_positive(&symbol)
            {
                debug!(%symbol, "sma slope not positive, entry skipped");
                continue;
            }

            let Some(signal) = self.entry_detector.detect_signal(&symbol, price, sma) else {
                continue;
            };
            info!(
                %symbol,
                %signal,
                price,
                sma,
                from_below = ?self.entry_detector.crossed_from_below(&symbol, sma),
                "entry signal"
            );

            let Some(event) = self.execute_entry(&symbol, signal, price, sma, projected, report)
            else {
                continue;
            };
            report.entries.push(event);

            open_count += 1;
            if !self.portfolio_manager.can_open_new_position(open_count) {
                break;
            }
        }
    }

    fn execute_entry(
        &mut self,
        symbol: &str,
        signal: EntrySignal,
        price: f64,
        sma: f64,
        projected: &mut PortfolioSnapshot,
        report: &mut StepReport,
    ) -> Option<EntryEvent> {
        let stop_price = self.exit_detector.stop_loss().calculate_stop_price(sma);
        let mut shares = self
            .sizer
            .calculate_shares(price, stop_price, projected.total_value);
        if shares <= 0 {
            debug!(%symbol, price, stop_price, "position size is zero, entry skipped");
            return None;
        }

        if shares as f64 * price > projected.cash {
            shares = (projected.cash / price * self.params.cash_buffer).floor() as i64;
            if shares <= 0 {
                debug!(%symbol, cash = projected.cash, "insufficient cash, entry skipped");
                return None;
            }
        }

        report.orders.push(OrderIntent::market_buy(symbol, shares));
        projected.apply_fill(symbol, shares, price);
        self.portfolio_manager.record_entry(symbol, price);
        self.exit_detector
            .stop_loss_mut()
            .update_stop_price(symbol, sma);

        let entry_number = self.portfolio_manager.get_entry_count(symbol);
        let risk = shares as f64 * (price - stop_price);
        info!(
            %symbol,
            shares,
            price,
            stop = stop_price,
            entry = entry_number,
            max_entries = self.params.max_entries_per_symbol,
            risk,
            "entry"
        );

        Some(EntryEvent {
            symbol: symbol.to_string(),
            signal,
            price,
            sma,
            shares,
            stop_price,
            entry_number,
            risk,
        })
    }

    fn update_price_history(&mut self, input: &StepInput) {
        for (symbol, bar) in &input.bars {
            if self.indicators.contains(symbol) {
                self.entry_detector.update_price_history(symbol, bar.close);
            }
        }
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    pub fn indicators(&self) -> &IndicatorManager {
        &self.indicators
    }

    pub fn portfolio_manager(&self) -> &PortfolioManager {
        &self.portfolio_manager
    }

    pub fn entry_detector(&self) -> &EntrySignalDetector {
        &self.entry_detector
    }

    pub fn exit_detector(&self) -> &ExitSignalDetector {
        &self.exit_detector
    }

    pub fn is_warm(&self) -> bool {
        self.warmup.is_warm()
    }

    /// Steps that passed warmup and the regime filter.
    pub fn steps_processed(&self) -> usize {
        self.steps_processed
    }

    /// Steps skipped because the regime filter was not bullish.
    pub fn blocked_days(&self) -> usize {
        self.blocked_days
    }
}
