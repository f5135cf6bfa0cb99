//! Broadcast decisions — which ledger writes emit a cross-session event.
//!
//! Personal records never broadcast. A shared bet emits exactly one event
//! per qualifying write: creation always announces, updates announce only
//! the transition into a win.

use crate::bets::types::{Bet, BetResult, TipType};
use crate::events::bus::FeedEvent;

fn tip_label(tip_type: Option<TipType>) -> &'static str {
    match tip_type {
        Some(TipType::Pro) => "PRO SIGNAL",
        // Unclassified shared tips are treated as the open class
        Some(TipType::Free) | None => "FREE TIP",
    }
}

fn new_tip_message(bet: &Bet) -> String {
    format!("{}: {} (@{:.2})", tip_label(bet.tip_type), bet.selection, bet.odds)
}

/// Event for a freshly created bet, if any.
pub fn on_create(bet: &Bet) -> Option<FeedEvent> {
    if !bet.sent_to_group {
        return None;
    }
    if bet.result == BetResult::Win {
        return Some(FeedEvent::vip_win(format!(
            "WIN CONFIRMED! {} hit",
            bet.selection
        )));
    }
    Some(FeedEvent::new_tip(new_tip_message(bet)))
}

/// Event for an updated bet, if any. `previous` is the stored result before
/// the write.
pub fn on_update(previous: BetResult, bet: &Bet) -> Option<FeedEvent> {
    if !bet.sent_to_group {
        return None;
    }
    if bet.result == BetResult::Win && previous != BetResult::Win {
        return Some(FeedEvent::vip_win(format!("VIP WIN! {}", bet.selection)));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::bus::is_pro_signal;
    use chrono::NaiveDate;

    fn bet(sent_to_group: bool, tip_type: Option<TipType>, result: BetResult) -> Bet {
        Bet {
            id: 7,
            owner_id: "tipster".into(),
            date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            sport: "football".into(),
            market: "goals".into(),
            selection: "Over 2.5".into(),
            odds: 1.7,
            stake_units: 1.0,
            result,
            profit_units: 0.0,
            confidence: 6,
            sent_to_group,
            tip_type,
            link: None,
            analysis: None,
            created_at: 0.0,
        }
    }

    #[test]
    fn personal_bets_never_broadcast() {
        assert!(on_create(&bet(false, None, BetResult::Win)).is_none());
        assert!(on_update(BetResult::Pending, &bet(false, None, BetResult::Win)).is_none());
    }

    #[test]
    fn shared_creation_announces_a_tip() {
        let ev = on_create(&bet(true, Some(TipType::Pro), BetResult::Pending)).unwrap();
        assert!(matches!(ev, FeedEvent::NewTip { .. }));
        assert!(is_pro_signal(ev.message()));
        assert!(ev.message().contains("Over 2.5"));
        assert!(ev.message().contains("@1.70"));
    }

    #[test]
    fn free_and_unclassified_tips_carry_no_pro_marker() {
        for tip_type in [Some(TipType::Free), None] {
            let ev = on_create(&bet(true, tip_type, BetResult::Pending)).unwrap();
            assert!(!is_pro_signal(ev.message()));
        }
    }

    #[test]
    fn creating_an_already_won_share_announces_the_win() {
        let ev = on_create(&bet(true, Some(TipType::Pro), BetResult::Win)).unwrap();
        assert!(matches!(ev, FeedEvent::VipWin { .. }));
    }

    #[test]
    fn only_the_transition_into_win_broadcasts_on_update() {
        let won = bet(true, Some(TipType::Pro), BetResult::Win);
        assert!(on_update(BetResult::Pending, &won).is_some());
        assert!(on_update(BetResult::Loss, &won).is_some());
        // already won — no duplicate announcement
        assert!(on_update(BetResult::Win, &won).is_none());
        // settling as a loss is silent
        let lost = bet(true, Some(TipType::Pro), BetResult::Loss);
        assert!(on_update(BetResult::Pending, &lost).is_none());
    }
}
