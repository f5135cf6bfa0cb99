//! Bankroll/unit arithmetic — converts unit-based figures to currency.

use serde::{Deserialize, Serialize};

use crate::config::BankrollDefaults;
use crate::db::models::DbSettings;
use crate::error::{Result, TrackerError};

/// Per-account staking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankrollSettings {
    /// Baseline capital in currency.
    pub start_bankroll: f64,
    /// One unit's value = start_bankroll / unit_divisor.
    pub unit_divisor: i64,
    /// Target cumulative profit in units for the current period.
    pub profit_goal: f64,
}

impl From<DbSettings> for BankrollSettings {
    fn from(row: DbSettings) -> Self {
        Self {
            start_bankroll: row.start_bankroll,
            unit_divisor: row.unit_divisor,
            profit_goal: row.profit_goal,
        }
    }
}

impl From<&BankrollDefaults> for BankrollSettings {
    fn from(defaults: &BankrollDefaults) -> Self {
        Self {
            start_bankroll: defaults.start_bankroll,
            unit_divisor: defaults.unit_divisor,
            profit_goal: defaults.profit_goal,
        }
    }
}

/// Currency value of one unit. `unit_divisor <= 0` is rejected rather than
/// producing Infinity/NaN.
pub fn unit_value(settings: &BankrollSettings) -> Result<f64> {
    if settings.unit_divisor <= 0 {
        return Err(TrackerError::InvalidConfiguration(format!(
            "unit_divisor must be positive, got {}",
            settings.unit_divisor
        )));
    }
    Ok(settings.start_bankroll / settings.unit_divisor as f64)
}

/// Convert a unit amount to currency.
pub fn to_currency(units: f64, settings: &BankrollSettings) -> Result<f64> {
    Ok(units * unit_value(settings)?)
}

/// Bankroll for display: baseline plus cumulative profit in currency.
pub fn current_bankroll(settings: &BankrollSettings, total_profit_units: f64) -> Result<f64> {
    Ok(settings.start_bankroll + to_currency(total_profit_units, settings)?)
}

/// Progress toward the period profit goal, clamped to 0–100.
pub fn goal_progress(total_profit_units: f64, settings: &BankrollSettings) -> f64 {
    if settings.profit_goal <= 0.0 {
        return 0.0;
    }
    (total_profit_units / settings.profit_goal * 100.0).clamp(0.0, 100.0)
}

pub fn goal_met(total_profit_units: f64, settings: &BankrollSettings) -> bool {
    settings.profit_goal > 0.0 && total_profit_units >= settings.profit_goal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(start: f64, divisor: i64, goal: f64) -> BankrollSettings {
        BankrollSettings {
            start_bankroll: start,
            unit_divisor: divisor,
            profit_goal: goal,
        }
    }

    #[test]
    fn unit_value_divides_bankroll() {
        let s = settings(1000.0, 30, 10.0);
        let v = unit_value(&s).unwrap();
        assert!((v - 33.333333).abs() < 1e-4);
    }

    #[test]
    fn zero_or_negative_divisor_is_invalid_configuration() {
        for divisor in [0, -3] {
            let s = settings(1000.0, divisor, 10.0);
            assert!(matches!(
                unit_value(&s),
                Err(TrackerError::InvalidConfiguration(_))
            ));
            assert!(to_currency(3.0, &s).is_err());
            assert!(current_bankroll(&s, 3.0).is_err());
        }
    }

    #[test]
    fn profit_units_convert_to_currency() {
        // 3.0 units at R$ 33.33/unit displays as R$ 100.00
        let s = settings(1000.0, 30, 10.0);
        let money = to_currency(3.0, &s).unwrap();
        assert!((money - 100.0).abs() < 1e-9);
        assert!((current_bankroll(&s, 3.0).unwrap() - 1100.0).abs() < 1e-9);
    }

    #[test]
    fn goal_progress_is_clamped() {
        let s = settings(1000.0, 30, 10.0);
        assert_eq!(goal_progress(-2.0, &s), 0.0);
        assert!((goal_progress(5.0, &s) - 50.0).abs() < 1e-9);
        assert_eq!(goal_progress(25.0, &s), 100.0);
        assert!(goal_met(10.0, &s));
        assert!(!goal_met(9.99, &s));
    }
}
