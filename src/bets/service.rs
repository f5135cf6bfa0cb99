//! Bet ledger — the write path for bet records.
//!
//! Profit is re-derived from (result, stake, odds) on every write; the
//! stored value is never taken from the caller. Broadcast decisions happen
//! here so no other module can emit feed events for bets.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{debug, info};

use crate::bankroll::outcome::resolve_profit;
use crate::bets::broadcast;
use crate::bets::types::{Bet, BetUpdate, NewBet};
use crate::db::queries;
use crate::error::{Result, TrackerError};
use crate::events::bus::{now_ts, EventBus};

pub struct BetLedger {
    db: PgPool,
    bus: Arc<EventBus>,
}

impl BetLedger {
    pub fn new(db: PgPool, bus: Arc<EventBus>) -> Self {
        Self { db, bus }
    }

    /// Create a bet for `owner_id`. Shared bets announce themselves on the bus.
    pub async fn create(&self, owner_id: &str, draft: NewBet) -> Result<Bet> {
        let confidence = draft.confidence.clamp(1, 10);
        let profit = resolve_profit(draft.result, draft.stake_units, draft.odds);

        let row = queries::insert_bet(
            &self.db,
            owner_id,
            draft.date,
            &draft.sport,
            &draft.market,
            &draft.selection,
            draft.odds,
            draft.stake_units,
            draft.result.as_str(),
            profit,
            confidence,
            draft.sent_to_group,
            draft.tip_type.map(|t| t.as_str()),
            draft.link.as_deref(),
            draft.analysis.as_deref(),
            now_ts(),
        )
        .await?;

        let bet = Bet::from(row);
        info!(bet_id = bet.id, owner_id, shared = bet.sent_to_group, "bet created");

        if let Some(event) = broadcast::on_create(&bet) {
            self.bus.publish(event);
        }
        Ok(bet)
    }

    /// Apply a partial update to a bet. Missing ids surface as `UnknownBet`.
    pub async fn update(&self, id: i64, update: BetUpdate) -> Result<Bet> {
        let existing = self.get(id).await?;
        let previous_result = existing.result;

        let date = update.date.unwrap_or(existing.date);
        let sport = update.sport.unwrap_or(existing.sport);
        let market = update.market.unwrap_or(existing.market);
        let selection = update.selection.unwrap_or(existing.selection);
        let odds = update.odds.unwrap_or(existing.odds);
        let stake_units = update.stake_units.unwrap_or(existing.stake_units);
        let result = update.result.unwrap_or(existing.result);
        let confidence = update.confidence.unwrap_or(existing.confidence).clamp(1, 10);
        let tip_type = update.tip_type.or(existing.tip_type);
        let link = update.link.or(existing.link);
        let analysis = update.analysis.or(existing.analysis);

        // Always re-derive; a re-opened win drops back to zero profit
        let profit = resolve_profit(result, stake_units, odds);

        let row = queries::update_bet(
            &self.db,
            id,
            date,
            &sport,
            &market,
            &selection,
            odds,
            stake_units,
            result.as_str(),
            profit,
            confidence,
            tip_type.map(|t| t.as_str()),
            link.as_deref(),
            analysis.as_deref(),
        )
        .await?
        .ok_or(TrackerError::UnknownBet(id))?;

        let bet = Bet::from(row);
        debug!(
            bet_id = bet.id,
            from = previous_result.as_str(),
            to = bet.result.as_str(),
            "bet updated"
        );

        if let Some(event) = broadcast::on_update(previous_result, &bet) {
            self.bus.publish(event);
        }
        Ok(bet)
    }

    /// Hard delete. Missing ids surface as `UnknownBet`.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let rows = queries::delete_bet(&self.db, id).await?;
        if rows == 0 {
            return Err(TrackerError::UnknownBet(id));
        }
        info!(bet_id = id, "bet deleted");
        Ok(())
    }

    /// Delete all of one owner's bets.
    pub async fn clear_history(&self, owner_id: &str) -> Result<u64> {
        let rows = queries::delete_bets_for_owner(&self.db, owner_id).await?;
        info!(owner_id, removed = rows, "bet history cleared");
        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> Result<Bet> {
        queries::get_bet(&self.db, id)
            .await?
            .map(Bet::from)
            .ok_or(TrackerError::UnknownBet(id))
    }

    /// One owner's bets, oldest first (insertion order within a day).
    pub async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Bet>> {
        let rows = queries::list_bets_for_owner(&self.db, owner_id).await?;
        Ok(rows.into_iter().map(Bet::from).collect())
    }

    /// All shared bets, newest first. Visibility gating happens downstream.
    pub async fn list_feed(&self) -> Result<Vec<Bet>> {
        let rows = queries::list_shared_bets(&self.db).await?;
        Ok(rows.into_iter().map(Bet::from).collect())
    }
}
