//! Fixed-fractional risk sizer.
//!
//! # Formula
//! ```text
//! risk_amount    = portfolio_value * risk_fraction
//! per_share_risk = entry_price - stop_price
//! shares         = floor(risk_amount / per_share_risk)
//! ```
//!
//! # Example
//! - Portfolio: $100,000, risk 1% ($1,000)
//! - Entry $100, stop $98 → $2 per share
//! - Shares: 500

#[derive(Debug, Clone, Copy)]
pub struct PositionSizer {
    risk_fraction: f64,
}

impl PositionSizer {
    pub fn new(risk_fraction: f64) -> Self {
        Self { risk_fraction }
    }

    /// Whole shares risking `risk_fraction` of `portfolio_value` between
    /// entry and stop. Degenerate inputs size to zero.
    pub fn calculate_shares(&self, entry_price: f64, stop_price: f64, portfolio_value: f64) -> i64 {
        let risk_amount = portfolio_value * self.risk_fraction;
        let per_share_risk = entry_price - stop_price;

        if per_share_risk.is_nan()
            || per_share_risk <= 0.0
            || !risk_amount.is_finite()
            || risk_amount <= 0.0
        {
            return 0;
        }

        let shares = (risk_amount / per_share_risk).floor();
        if shares.is_finite() && shares > 0.0 {
            shares as i64
        } else {
            0
        }
    }
}
