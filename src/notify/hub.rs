//! Session hub — one notification center per active session, each with its
//! own bus subscription.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::info;

use crate::accounts::types::Viewer;
use crate::events::bus::EventBus;
use crate::notify::center::NotificationCenter;
use crate::notify::sinks::{AudioSink, SystemNotifier};

struct SessionEntry {
    center: Arc<NotificationCenter>,
    consumer: JoinHandle<()>,
}

pub struct SessionHub {
    sessions: DashMap<String, SessionEntry>,
    bus: Arc<EventBus>,
    audio: Arc<dyn AudioSink>,
    system: Arc<dyn SystemNotifier>,
    toast_capacity: usize,
}

impl SessionHub {
    pub fn new(
        bus: Arc<EventBus>,
        audio: Arc<dyn AudioSink>,
        system: Arc<dyn SystemNotifier>,
        toast_capacity: usize,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            bus,
            audio,
            system,
            toast_capacity,
        }
    }

    /// Open (or reopen) a session for a viewer and start consuming events.
    pub fn register(&self, viewer: Viewer) -> Arc<NotificationCenter> {
        let user_id = viewer.user_id.clone();
        let center = NotificationCenter::new(
            viewer,
            self.toast_capacity,
            self.audio.clone(),
            self.system.clone(),
        );

        let consumer = tokio::spawn(center.clone().run(self.bus.subscribe()));
        let entry = SessionEntry {
            center: center.clone(),
            consumer,
        };

        if let Some(previous) = self.sessions.insert(user_id.clone(), entry) {
            previous.consumer.abort();
        }
        info!(%user_id, sessions = self.sessions.len(), "session registered");
        center
    }

    pub fn get(&self, user_id: &str) -> Option<Arc<NotificationCenter>> {
        self.sessions.get(user_id).map(|e| e.center.clone())
    }

    /// Close a session and stop its consumer.
    pub fn remove(&self, user_id: &str) -> bool {
        match self.sessions.remove(user_id) {
            Some((_, entry)) => {
                entry.consumer.abort();
                info!(user_id, "session closed");
                true
            }
            None => false,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::types::{Plan, Role};
    use crate::bets::types::{Bet, BetResult, TipType};
    use crate::notify::center::LOCKED_TIP_NOTICE;
    use crate::notify::sinks::{LogAudioSink, NoopNotifier};

    fn hub() -> (Arc<EventBus>, SessionHub) {
        let bus = Arc::new(EventBus::new(64));
        let hub = SessionHub::new(
            bus.clone(),
            Arc::new(LogAudioSink),
            Arc::new(NoopNotifier),
            50,
        );
        (bus, hub)
    }

    fn viewer(id: &str, plan: Plan) -> Viewer {
        Viewer {
            user_id: id.into(),
            role: Role::User,
            plan,
        }
    }

    fn shared_win_bet() -> Bet {
        Bet {
            id: 1,
            owner_id: "tipster".into(),
            date: chrono::NaiveDate::from_ymd_opt(2026, 5, 9).unwrap(),
            sport: "football".into(),
            market: "goals".into(),
            selection: "Over 2.5".into(),
            odds: 1.7,
            stake_units: 2.0,
            result: BetResult::Win,
            profit_units: crate::bankroll::outcome::resolve_profit(BetResult::Win, 2.0, 1.7),
            confidence: 8,
            sent_to_group: true,
            tip_type: Some(TipType::Pro),
            link: None,
            analysis: None,
            created_at: 0.0,
        }
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn win_broadcast_reaches_another_session_and_self_terminates() {
        let (bus, hub) = hub();
        let receiver = hub.register(viewer("fan", Plan::Free));

        let event = crate::bets::broadcast::on_create(&shared_win_bet()).unwrap();
        bus.publish(event);
        settle().await;

        let toasts = receiver.drain_toasts();
        assert_eq!(toasts.len(), 1);
        assert!(receiver.celebrating());

        // Another event inside the window must not wedge the effect on
        tokio::time::advance(std::time::Duration::from_secs(3)).await;
        settle().await;
        bus.publish(crate::events::bus::FeedEvent::vip_win("VIP WIN! Another".into()));
        settle().await;
        assert!(receiver.celebrating());

        tokio::time::advance(std::time::Duration::from_secs(6)).await;
        settle().await;
        assert!(!receiver.celebrating());
    }

    #[tokio::test]
    async fn sessions_apply_their_own_plan_gate() {
        let (bus, hub) = hub();
        let free_session = hub.register(viewer("fan", Plan::Free));
        let pro_session = hub.register(viewer("whale", Plan::Pro));
        assert_eq!(hub.session_count(), 2);

        bus.publish(crate::events::bus::FeedEvent::new_tip(
            "PRO SIGNAL: Over 2.5 (@1.70)".into(),
        ));
        settle().await;

        let free_toasts = free_session.drain_toasts();
        let pro_toasts = pro_session.drain_toasts();
        assert_eq!(free_toasts[0].message, LOCKED_TIP_NOTICE);
        assert_eq!(pro_toasts[0].message, "PRO SIGNAL: Over 2.5 (@1.70)");
    }

    #[tokio::test]
    async fn closing_a_session_stops_delivery() {
        let (bus, hub) = hub();
        let session = hub.register(viewer("fan", Plan::Pro));
        assert!(hub.remove("fan"));
        settle().await;

        bus.publish(crate::events::bus::FeedEvent::new_tip(
            "FREE TIP: Over 2.5 (@1.70)".into(),
        ));
        settle().await;
        assert!(session.drain_toasts().is_empty());
        assert!(!hub.remove("fan"));
    }
}
