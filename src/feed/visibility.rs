//! Content visibility gate — the single authority deciding what a viewer
//! may see of a bet.
//!
//! Every surface (feed assembly, notifications) consults this module rather
//! than re-deriving role/plan rules locally. Locked is an outcome callers
//! branch on, not an error.

use crate::accounts::types::{Plan, Viewer};
use crate::bets::types::{Bet, TipType};

/// What a given viewer may see of a given bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// All fields.
    Full,
    /// The record exists but protected fields must not reach the viewer.
    Locked,
    /// The record is not shown at all.
    Hidden,
}

/// Evaluate the gate. Deterministic and side-effect free.
pub fn visibility(bet: &Bet, viewer: &Viewer) -> Visibility {
    // Owners always see their own records
    if bet.owner_id == viewer.user_id {
        return Visibility::Full;
    }
    // Personal records never leave their owner
    if !bet.sent_to_group {
        return Visibility::Hidden;
    }
    if viewer.is_admin() {
        return Visibility::Full;
    }
    match bet.tip_type {
        // Absent classification on a shared tip is the most open class
        Some(TipType::Free) | None => Visibility::Full,
        Some(TipType::Pro) if viewer.plan == Plan::Pro => Visibility::Full,
        Some(TipType::Pro) => Visibility::Locked,
    }
}

/// Convenience predicate: full access only.
pub fn is_visible(bet: &Bet, viewer: &Viewer) -> bool {
    visibility(bet, viewer) == Visibility::Full
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::types::Role;
    use chrono::NaiveDate;

    fn shared_bet(owner: &str, tip_type: Option<TipType>) -> Bet {
        let mut bet = personal_bet(owner);
        bet.sent_to_group = true;
        bet.tip_type = tip_type;
        bet
    }

    fn personal_bet(owner: &str) -> Bet {
        Bet {
            id: 1,
            owner_id: owner.into(),
            date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            sport: "basketball".into(),
            market: "handicap".into(),
            selection: "Lakers -5.5".into(),
            odds: 1.9,
            stake_units: 1.0,
            result: crate::bets::types::BetResult::Pending,
            profit_units: 0.0,
            confidence: 7,
            sent_to_group: false,
            tip_type: None,
            link: Some("https://example.com/bet".into()),
            analysis: Some("strong home form".into()),
            created_at: 0.0,
        }
    }

    fn viewer(id: &str, role: Role, plan: Plan) -> Viewer {
        Viewer {
            user_id: id.into(),
            role,
            plan,
        }
    }

    #[test]
    fn personal_bets_are_hidden_from_everyone_but_the_owner() {
        let bet = personal_bet("tipster");
        let stranger = viewer("someone", Role::User, Plan::Pro);
        assert_eq!(visibility(&bet, &stranger), Visibility::Hidden);
        let owner = viewer("tipster", Role::User, Plan::Free);
        assert_eq!(visibility(&bet, &owner), Visibility::Full);
    }

    #[test]
    fn admins_see_every_shared_tip() {
        let admin = viewer("boss", Role::Admin, Plan::Free);
        for tip_type in [Some(TipType::Pro), Some(TipType::Free), None] {
            let bet = shared_bet("tipster", tip_type);
            assert_eq!(visibility(&bet, &admin), Visibility::Full);
        }
    }

    #[test]
    fn pro_tips_lock_for_free_viewers() {
        let bet = shared_bet("tipster", Some(TipType::Pro));
        let free_user = viewer("fan", Role::User, Plan::Free);
        let pro_user = viewer("whale", Role::User, Plan::Pro);
        assert_eq!(visibility(&bet, &free_user), Visibility::Locked);
        assert!(!is_visible(&bet, &free_user));
        assert!(is_visible(&bet, &pro_user));
    }

    #[test]
    fn free_and_unclassified_tips_are_open_to_all() {
        let free_user = viewer("fan", Role::User, Plan::Free);
        assert!(is_visible(&shared_bet("tipster", Some(TipType::Free)), &free_user));
        assert!(is_visible(&shared_bet("tipster", None), &free_user));
    }
}
