//! Aggregate statistics — rollups over one owner's (or the feed's) bets.
//!
//! Recomputed on every read; nothing here caches. Ordering inside a day
//! falls back to insertion order (serial id).

use serde::Serialize;

use crate::bets::types::{Bet, BetResult};

/// Headline rollup for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct BankrollStats {
    pub total_bets: usize,
    /// Percentage of settled bets won; voids settle but never win.
    pub win_rate: f64,
    /// Profit over turnover for win/loss bets, as a percentage.
    pub roi: f64,
    pub total_profit_units: f64,
    /// Signed length of the latest win (positive) or loss (negative) run.
    pub current_streak: i64,
}

/// One point of the cumulative-profit chart.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub date: Option<chrono::NaiveDate>,
    pub profit: f64,
    pub roi: f64,
}

fn chronological(bets: &[Bet]) -> Vec<&Bet> {
    let mut ordered: Vec<&Bet> = bets.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    ordered
}

/// Roll a bet collection up into headline stats.
pub fn summarize(bets: &[Bet]) -> BankrollStats {
    let total_bets = bets.len();
    let total_profit_units: f64 = bets.iter().map(|b| b.profit_units).sum();

    let settled = bets.iter().filter(|b| b.result.is_settled()).count();
    let wins = bets.iter().filter(|b| b.result == BetResult::Win).count();
    let win_rate = if settled == 0 {
        0.0
    } else {
        wins as f64 / settled as f64 * 100.0
    };

    let turnover: f64 = bets
        .iter()
        .filter(|b| b.result.counts_for_roi())
        .map(|b| b.stake_units)
        .sum();
    let staked_profit: f64 = bets
        .iter()
        .filter(|b| b.result.counts_for_roi())
        .map(|b| b.profit_units)
        .sum();
    let roi = if turnover <= 0.0 {
        0.0
    } else {
        staked_profit / turnover * 100.0
    };

    BankrollStats {
        total_bets,
        win_rate,
        roi,
        total_profit_units,
        current_streak: current_streak(bets),
    }
}

/// Latest consecutive run of same-outcome win/loss bets, newest first.
/// Voids and pendings are skipped entirely; no win/loss history means zero.
pub fn current_streak(bets: &[Bet]) -> i64 {
    let ordered = chronological(bets);
    let mut run = 0i64;
    let mut run_result: Option<BetResult> = None;

    for bet in ordered.iter().rev() {
        if !bet.result.counts_for_roi() {
            continue;
        }
        match run_result {
            None => {
                run_result = Some(bet.result);
                run = 1;
            }
            Some(r) if r == bet.result => run += 1,
            Some(_) => break,
        }
    }

    match run_result {
        Some(BetResult::Win) => run,
        Some(BetResult::Loss) => -run,
        _ => 0,
    }
}

/// Cumulative profit (and running ROI) per settled win/loss bet, oldest
/// first, prefixed with an explicit zero point for charting.
pub fn profit_series(bets: &[Bet]) -> Vec<SeriesPoint> {
    let mut points = vec![SeriesPoint {
        label: "start".into(),
        date: None,
        profit: 0.0,
        roi: 0.0,
    }];

    let mut cumulative_profit = 0.0;
    let mut cumulative_stake = 0.0;

    for bet in chronological(bets) {
        if !bet.result.counts_for_roi() {
            continue;
        }
        cumulative_profit += bet.profit_units;
        cumulative_stake += bet.stake_units;
        let roi = if cumulative_stake > 0.0 {
            cumulative_profit / cumulative_stake * 100.0
        } else {
            0.0
        };
        points.push(SeriesPoint {
            label: format!("{}", points.len()),
            date: Some(bet.date),
            profit: cumulative_profit,
            roi,
        });
    }

    points
}
