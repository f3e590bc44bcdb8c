//! Strategy parameters — every tunable of the strategy in one place.
//!
//! Parameters are compile-/start-time constants. They are loaded once from
//! TOML (missing keys fall back to the reference values), validated, and then
//! handed to the orchestrator. An invalid combination is fatal at startup.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parameter `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Complete parameter set for the strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    // ── Run window ──
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub starting_cash: f64,
    /// Steps observed before any decision is made.
    pub warmup_days: usize,

    // ── Indicators ──
    pub sma_period: usize,
    pub atr_period: usize,
    /// Steps back the current SMA is compared against for the slope check.
    pub sma_slope_lookback: usize,

    // ── Risk ──
    /// Fraction of portfolio value put at risk per entry.
    pub risk_per_trade: f64,
    pub max_positions: usize,
    pub max_entries_per_symbol: u32,
    /// Share of available cash usable when an order would exceed it.
    pub cash_buffer: f64,

    // ── Entry ──
    pub cross_distance_threshold: f64,
    pub retest_min_distance: f64,
    pub retest_max_distance: f64,
    pub require_positive_sma_slope: bool,

    // ── Exit ──
    /// Static stop distance below the SMA.
    pub stop_loss_percentage: f64,
    pub trailing_profit_threshold: f64,
    pub trailing_atr_multiplier: f64,

    // ── Universe ──
    pub benchmark: String,
    pub universe_size: usize,
    pub minimum_market_cap: f64,
    /// Fallback universe when no market-cap data is available.
    pub test_securities: Vec<String>,

    // ── Logging ──
    /// Emit a status line every N processed steps.
    pub debug_interval: usize,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2017, 12, 31).unwrap_or_default(),
            starting_cash: 100_000.0,
            warmup_days: 155,
            sma_period: 150,
            atr_period: 14,
            sma_slope_lookback: 5,
            risk_per_trade: 0.01,
            max_positions: 2,
            max_entries_per_symbol: 2,
            cash_buffer: 0.95,
            cross_distance_threshold: 0.01,
            retest_min_distance: 0.03,
            retest_max_distance: 0.04,
            require_positive_sma_slope: false,
            stop_loss_percentage: 0.015,
            trailing_profit_threshold: 0.15,
            trailing_atr_multiplier: 2.0,
            benchmark: "SPY".to_string(),
            universe_size: 100,
            minimum_market_cap: 1_000_000_000.0,
            test_securities: ["AAPL", "MSFT", "GOOGL", "TSLA", "NVDA", "META", "AMZN", "NFLX"]
                .into_iter()
                .map(String::from)
                .collect(),
            debug_interval: 50,
        }
    }
}

impl StrategyParams {
    /// Parse parameters from a TOML string. Keys not present keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load parameters from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML (used by `rom150 params`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject inconsistent parameter combinations.
    ///
    /// NaN never falls inside a valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.risk_per_trade > 0.0 && self.risk_per_trade <= 0.1) {
            return Err(ConfigError::invalid(
                "risk_per_trade",
                format!("must be in (0, 0.1], got {}", self.risk_per_trade),
            ));
        }
        if self.max_positions < 1 {
            return Err(ConfigError::invalid("max_positions", "must be at least 1"));
        }
        if self.cross_distance_threshold.is_nan() || self.cross_distance_threshold <= 0.0 {
            return Err(ConfigError::invalid(
                "cross_distance_threshold",
                "must be positive",
            ));
        }
        if self.retest_min_distance.is_nan()
            || self.retest_max_distance.is_nan()
            || self.retest_min_distance >= self.retest_max_distance
        {
            return Err(ConfigError::invalid(
                "retest_min_distance",
                format!(
                    "must be less than retest_max_distance ({} >= {})",
                    self.retest_min_distance, self.retest_max_distance
                ),
            ));
        }
        if self.max_entries_per_symbol < 1 {
            return Err(ConfigError::invalid(
                "max_entries_per_symbol",
                "must be at least 1",
            ));
        }
        if self.sma_period == 0 {
            return Err(ConfigError::invalid("sma_period", "must be at least 1"));
        }
        if self.atr_period == 0 {
            return Err(ConfigError::invalid("atr_period", "must be at least 1"));
        }
        if self.sma_slope_lookback == 0 {
            return Err(ConfigError::invalid("sma_slope_lookback", "must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.stop_loss_percentage) {
            return Err(ConfigError::invalid(
                "stop_loss_percentage",
                "must be in [0, 1)",
            ));
        }
        if self.trailing_atr_multiplier.is_nan() || self.trailing_atr_multiplier <= 0.0 {
            return Err(ConfigError::invalid(
                "trailing_atr_multiplier",
                "must be positive",
            ));
        }
        if !(self.cash_buffer > 0.0 && self.cash_buffer <= 1.0) {
            return Err(ConfigError::invalid("cash_buffer", "must be in (0, 1]"));
        }
        if self.start_date > self.end_date {
            return Err(ConfigError::invalid(
                "start_date",
                format!("{} is after end_date {}", self.start_date, self.end_date),
            ));
        }
        Ok(())
    }

    /// BLAKE3 hash of the canonical JSON form, hex encoded.
    ///
    /// Two runs with identical parameters share a fingerprint.
    pub fn fingerprint(&self) -> String {
        // Struct fields serialize in declaration order, so the JSON is stable.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(StrategyParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_risk_out_of_range() {
        for risk in [0.0, -0.01, 0.11] {
            let params = StrategyParams {
                risk_per_trade: risk,
                ..StrategyParams::default()
            };
            let err = params.validate().unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { field: "risk_per_trade", .. }),
                "risk {risk} should be rejected, got {err}"
            );
        }
        let upper = StrategyParams {
            risk_per_trade: 0.1,
            ..StrategyParams::default()
        };
        assert!(upper.validate().is_ok());
    }

    #[test]
    fn rejects_zero_max_positions() {
        let params = StrategyParams {
            max_positions: 0,
            ..StrategyParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::Invalid { field: "max_positions", .. })
        ));
    }

    #[test]
    fn rejects_non_positive_cross_threshold() {
        let params = StrategyParams {
            cross_distance_threshold: 0.0,
            ..StrategyParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::Invalid { field: "cross_distance_threshold", .. })
        ));
    }

    #[test]
    fn rejects_inverted_retest_band() {
        let params = StrategyParams {
            retest_min_distance: 0.04,
            retest_max_distance: 0.04,
            ..StrategyParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::Invalid { field: "retest_min_distance", .. })
        ));
    }

    #[test]
    fn rejects_nan_risk_from_toml() {
        let params = StrategyParams::from_toml_str("risk_per_trade = nan").unwrap();
        assert!(matches!(
            params.validate(),
            Err(ConfigError::Invalid { field: "risk_per_trade", .. })
        ));
    }

    #[test]
    fn rejects_nan_cross_threshold() {
        let params = StrategyParams::from_toml_str("cross_distance_threshold = nan").unwrap();
        assert!(matches!(
            params.validate(),
            Err(ConfigError::Invalid { field: "cross_distance_threshold", .. })
        ));
    }

    #[test]
    fn rejects_nan_retest_bounds() {
        for key in ["retest_min_distance", "retest_max_distance"] {
            let params = StrategyParams::from_toml_str(&format!("{key} = nan")).unwrap();
            assert!(
                matches!(
                    params.validate(),
                    Err(ConfigError::Invalid { field: "retest_min_distance", .. })
                ),
                "{key} = nan should be rejected"
            );
        }
    }

    #[test]
    fn rejects_nan_trailing_multiplier_and_cash_buffer() {
        let trailing = StrategyParams {
            trailing_atr_multiplier: f64::NAN,
            ..StrategyParams::default()
        };
        assert!(matches!(
            trailing.validate(),
            Err(ConfigError::Invalid { field: "trailing_atr_multiplier", .. })
        ));

        let buffer = StrategyParams {
            cash_buffer: f64::NAN,
            ..StrategyParams::default()
        };
        assert!(matches!(
            buffer.validate(),
            Err(ConfigError::Invalid { field: "cash_buffer", .. })
        ));
    }

    #[test]
    fn rejects_start_after_end() {
        let params = StrategyParams {
            start_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            ..StrategyParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let params = StrategyParams::from_toml_str(
            r#"
            max_positions = 5
            risk_per_trade = 0.02
            start_date = "2019-01-02"
            "#,
        )
        .unwrap();
        assert_eq!(params.max_positions, 5);
        assert_eq!(params.risk_per_trade, 0.02);
        assert_eq!(params.start_date, NaiveDate::from_ymd_opt(2019, 1, 2).unwrap());
        assert_eq!(params.sma_period, 150);
        assert_eq!(params.benchmark, "SPY");
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = StrategyParams::from_toml_str("max_positions = \"two\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_roundtrip_preserves_params() {
        let params = StrategyParams::default();
        let text = params.to_toml().unwrap();
        let back = StrategyParams::from_toml_str(&text).unwrap();
        assert_eq!(params, back);
    }

    #[test]
    fn fingerprint_tracks_parameter_values() {
        let a = StrategyParams::default();
        let b = StrategyParams {
            max_positions: 3,
            ..StrategyParams::default()
        };
        assert_eq!(a.fingerprint(), StrategyParams::default().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }
}
