//! Feed assembly — turns gate decisions into serializable cards.
//!
//! The locked card is built from a short allowlist of fields; protected
//! content (selection, market, odds, link, analysis, stake) never enters
//! the structure handed to the presentation layer.

use serde::Serialize;

use crate::accounts::types::Viewer;
use crate::bets::types::{Bet, BetResult, TipType};
use crate::feed::visibility::{visibility, Visibility};

/// A fully visible tip card.
#[derive(Debug, Clone, Serialize)]
pub struct TipView {
    pub id: i64,
    pub date: chrono::NaiveDate,
    pub sport: String,
    pub market: String,
    pub selection: String,
    pub odds: f64,
    pub stake_units: f64,
    pub result: BetResult,
    pub profit_units: f64,
    pub confidence: i32,
    pub tip_type: Option<TipType>,
    pub link: Option<String>,
    pub analysis: Option<String>,
}

/// A locked placeholder card for plan-gated tips.
#[derive(Debug, Clone, Serialize)]
pub struct LockedTip {
    pub id: i64,
    pub date: chrono::NaiveDate,
    pub result: BetResult,
    pub confidence: i32,
    pub tip_type: Option<TipType>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedItem {
    Open(TipView),
    Locked(LockedTip),
}

fn open_card(bet: &Bet) -> TipView {
    TipView {
        id: bet.id,
        date: bet.date,
        sport: bet.sport.clone(),
        market: bet.market.clone(),
        selection: bet.selection.clone(),
        odds: bet.odds,
        stake_units: bet.stake_units,
        result: bet.result,
        profit_units: bet.profit_units,
        confidence: bet.confidence,
        tip_type: bet.tip_type,
        link: bet.link.clone(),
        analysis: bet.analysis.clone(),
    }
}

fn locked_card(bet: &Bet) -> LockedTip {
    LockedTip {
        id: bet.id,
        date: bet.date,
        result: bet.result,
        confidence: bet.confidence,
        tip_type: bet.tip_type,
    }
}

/// Gate-filter a bet collection for one viewer. Hidden records are dropped.
pub fn assemble(bets: &[Bet], viewer: &Viewer) -> Vec<FeedItem> {
    bets.iter()
        .filter_map(|bet| match visibility(bet, viewer) {
            Visibility::Full => Some(FeedItem::Open(open_card(bet))),
            Visibility::Locked => Some(FeedItem::Locked(locked_card(bet))),
            Visibility::Hidden => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::types::{Plan, Role};
    use chrono::NaiveDate;

    fn bet(id: i64, sent_to_group: bool, tip_type: Option<TipType>) -> Bet {
        Bet {
            id,
            owner_id: "tipster".into(),
            date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            sport: "tennis".into(),
            market: "set betting".into(),
            selection: "Djokovic 2-0".into(),
            odds: 1.85,
            stake_units: 1.5,
            result: BetResult::Pending,
            profit_units: 0.0,
            confidence: 8,
            sent_to_group,
            tip_type,
            link: Some("https://example.com".into()),
            analysis: Some("serve dominance".into()),
            created_at: id as f64,
        }
    }

    fn free_viewer() -> Viewer {
        Viewer {
            user_id: "fan".into(),
            role: Role::User,
            plan: Plan::Free,
        }
    }

    #[test]
    fn hidden_records_are_dropped_entirely() {
        let bets = vec![bet(1, false, None), bet(2, true, Some(TipType::Free))];
        let items = assemble(&bets, &free_viewer());
        assert_eq!(items.len(), 1);
        assert!(matches!(&items[0], FeedItem::Open(v) if v.id == 2));
    }

    #[test]
    fn locked_card_leaks_no_protected_fields() {
        let bets = vec![bet(1, true, Some(TipType::Pro))];
        let items = assemble(&bets, &free_viewer());
        let json = serde_json::to_value(&items).unwrap();
        let card = &json[0];
        assert_eq!(card["kind"], "locked");
        assert!(card.get("selection").is_none());
        assert!(card.get("market").is_none());
        assert!(card.get("link").is_none());
        assert!(card.get("analysis").is_none());
        assert!(card.get("odds").is_none());
        assert!(card.get("stake_units").is_none());
    }

    #[test]
    fn pro_viewer_gets_the_open_card() {
        let pro = Viewer {
            user_id: "whale".into(),
            role: Role::User,
            plan: Plan::Pro,
        };
        let bets = vec![bet(1, true, Some(TipType::Pro))];
        let items = assemble(&bets, &pro);
        assert!(matches!(&items[0], FeedItem::Open(v) if v.selection == "Djokovic 2-0"));
    }
}
