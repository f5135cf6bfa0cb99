//! Bet domain types and conversions from database rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::models::DbBet;

/// Outcome of a bet. Starts `Pending`; settles to one terminal value,
/// though re-opening is tolerated (profit is re-derived on every transition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BetResult {
    Pending,
    Win,
    Loss,
    Void,
}

impl BetResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Win => "WIN",
            Self::Loss => "LOSS",
            Self::Void => "VOID",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "WIN" => Some(Self::Win),
            "LOSS" => Some(Self::Loss),
            "VOID" => Some(Self::Void),
            _ => None,
        }
    }

    /// Settled = anything but pending. Voids settle without counting for ROI.
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Only wins and losses move the bankroll.
    pub fn counts_for_roi(&self) -> bool {
        matches!(self, Self::Win | Self::Loss)
    }
}

/// Distribution class of a shared tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipType {
    Pro,
    Free,
}

impl TipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pro => "pro",
            Self::Free => "free",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pro" => Some(Self::Pro),
            "free" => Some(Self::Free),
            _ => None,
        }
    }
}

/// A single wagering record.
#[derive(Debug, Clone, Serialize)]
pub struct Bet {
    pub id: i64,
    pub owner_id: String,
    /// Calendar date of the event, not bet-placement time.
    pub date: NaiveDate,
    pub sport: String,
    pub market: String,
    pub selection: String,
    pub odds: f64,
    pub stake_units: f64,
    pub result: BetResult,
    /// Derived from (result, stake_units, odds) — never caller-supplied.
    pub profit_units: f64,
    pub confidence: i32,
    pub sent_to_group: bool,
    pub tip_type: Option<TipType>,
    pub link: Option<String>,
    pub analysis: Option<String>,
    pub created_at: f64,
}

impl From<DbBet> for Bet {
    fn from(row: DbBet) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            date: row.date,
            sport: row.sport,
            market: row.market,
            selection: row.selection,
            odds: row.odds,
            stake_units: row.stake_units,
            result: BetResult::from_str(&row.result).unwrap_or(BetResult::Pending),
            profit_units: row.profit_units,
            confidence: row.confidence,
            sent_to_group: row.sent_to_group,
            tip_type: row.tip_type.as_deref().and_then(TipType::from_str),
            link: row.link,
            analysis: row.analysis,
            created_at: row.created_at,
        }
    }
}

fn default_confidence() -> i32 {
    5
}
fn default_result() -> BetResult {
    BetResult::Pending
}

/// Payload for creating a bet. Carries no profit field — profit is
/// re-derived module-side.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBet {
    pub date: NaiveDate,
    pub sport: String,
    pub market: String,
    pub selection: String,
    pub odds: f64,
    pub stake_units: f64,
    #[serde(default = "default_result")]
    pub result: BetResult,
    #[serde(default = "default_confidence")]
    pub confidence: i32,
    #[serde(default)]
    pub sent_to_group: bool,
    #[serde(default)]
    pub tip_type: Option<TipType>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub analysis: Option<String>,
}

/// Partial update. `sent_to_group` is fixed at creation and absent here,
/// as is any profit field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BetUpdate {
    pub date: Option<NaiveDate>,
    pub sport: Option<String>,
    pub market: Option<String>,
    pub selection: Option<String>,
    pub odds: Option<f64>,
    pub stake_units: Option<f64>,
    pub result: Option<BetResult>,
    pub confidence: Option<i32>,
    pub tip_type: Option<TipType>,
    pub link: Option<String>,
    pub analysis: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_round_trips_through_storage_strings() {
        for r in [BetResult::Pending, BetResult::Win, BetResult::Loss, BetResult::Void] {
            assert_eq!(BetResult::from_str(r.as_str()), Some(r));
        }
        assert_eq!(BetResult::from_str("HALF_WIN"), None);
    }

    #[test]
    fn settlement_classes() {
        assert!(!BetResult::Pending.is_settled());
        assert!(BetResult::Void.is_settled());
        assert!(!BetResult::Void.counts_for_roi());
        assert!(BetResult::Loss.counts_for_roi());
    }
}
