//! Bet outcome resolution — profit in units from (result, stake, odds).

use crate::bets::types::BetResult;

/// Net profit in units for a bet at decimal odds.
///
/// Re-derived on every create and result transition; caller-supplied profit
/// is never trusted. Win pays `stake * odds - stake`; a re-opened bet
/// (back to pending) resets to zero.
pub fn resolve_profit(result: BetResult, stake_units: f64, odds: f64) -> f64 {
    match result {
        BetResult::Win => stake_units * odds - stake_units,
        BetResult::Loss => -stake_units,
        BetResult::Void | BetResult::Pending => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_pays_net_winnings_at_decimal_odds() {
        // stake 2 @ 2.5 -> 2*2.5 - 2 = 3.0
        assert!((resolve_profit(BetResult::Win, 2.0, 2.5) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn win_profit_is_strictly_positive_above_even_odds() {
        for odds in [1.01, 1.5, 3.0, 12.75] {
            assert!(resolve_profit(BetResult::Win, 1.0, odds) > 0.0);
        }
    }

    #[test]
    fn loss_forfeits_exactly_the_stake() {
        assert_eq!(resolve_profit(BetResult::Loss, 2.0, 2.5), -2.0);
    }

    #[test]
    fn void_and_pending_are_flat() {
        assert_eq!(resolve_profit(BetResult::Void, 2.0, 2.5), 0.0);
        assert_eq!(resolve_profit(BetResult::Pending, 2.0, 2.5), 0.0);
    }

    #[test]
    fn resolution_is_deterministic() {
        let a = resolve_profit(BetResult::Win, 1.75, 1.91);
        let b = resolve_profit(BetResult::Win, 1.75, 1.91);
        assert_eq!(a, b);
    }
}
