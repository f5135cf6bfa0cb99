//! Per-session notification center — consumes bus events on behalf of one
//! viewer and turns them into local side effects.
//!
//! The viewer's own visibility rules apply here, before anything reaches a
//! sink: a free-plan session learns that a pro signal exists, never what it
//! says. Win celebrations are not gated.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::accounts::types::{Plan, Viewer};
use crate::events::bus::{is_pro_signal, now_ts, FeedEvent};
use crate::notify::celebration::Celebration;
use crate::notify::sinks::{AudioSink, NotifyPermission, SoundClip, SystemNotifier};

/// Generic notice shown when a pro signal reaches a free-plan session.
pub const LOCKED_TIP_NOTICE: &str = "New PRO signal (locked) — upgrade to view";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Info,
}

/// An in-app notice queued for the session to poll.
#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub timestamp: f64,
}

pub struct NotificationCenter {
    viewer: Viewer,
    toasts: Mutex<VecDeque<Toast>>,
    capacity: usize,
    celebration: Celebration,
    last_event_id: AtomicI64,
    audio: Arc<dyn AudioSink>,
    system: Arc<dyn SystemNotifier>,
}

impl NotificationCenter {
    pub fn new(
        viewer: Viewer,
        capacity: usize,
        audio: Arc<dyn AudioSink>,
        system: Arc<dyn SystemNotifier>,
    ) -> Arc<Self> {
        Arc::new(Self {
            viewer,
            toasts: Mutex::new(VecDeque::new()),
            capacity,
            celebration: Celebration::new(),
            last_event_id: AtomicI64::new(0),
            audio,
            system,
        })
    }

    /// Consume bus events until the channel closes.
    pub async fn run(self: Arc<Self>, mut events: broadcast::Receiver<FeedEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.handle_event(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, user_id = %self.viewer.user_id, "session receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Process one event. Duplicate deliveries are ignored.
    pub fn handle_event(&self, event: &FeedEvent) {
        let id = event.event_id();
        // Ids are monotonic, so any replayed or duplicated delivery is stale
        if self.last_event_id.fetch_max(id, Ordering::SeqCst) >= id {
            debug!(event_id = id, "duplicate event dropped");
            return;
        }

        match event {
            FeedEvent::VipWin { message, .. } => self.on_vip_win(message),
            FeedEvent::NewTip { message, .. } => self.on_new_tip(message),
        }
    }

    /// A win celebration reaches every session, whatever its plan.
    fn on_vip_win(&self, message: &str) {
        self.audio.play(SoundClip::CashRegister);
        self.push_toast(message.to_string(), ToastKind::Success);
        if self.system.permission() == NotifyPermission::Granted {
            self.system.notify("WIN CONFIRMED", message);
        }
        self.celebration.trigger();
    }

    fn on_new_tip(&self, message: &str) {
        let pro = is_pro_signal(message);
        let locked = pro && self.viewer.plan == Plan::Free && !self.viewer.is_admin();

        self.audio.play(SoundClip::NewTip);
        if locked {
            // No selection/market detail may leak into the notice
            self.push_toast(LOCKED_TIP_NOTICE.to_string(), ToastKind::Info);
            return;
        }

        self.push_toast(message.to_string(), ToastKind::Info);
        if self.system.permission() == NotifyPermission::Granted {
            let title = if pro { "NEW PRO SIGNAL" } else { "NEW FREE TIP" };
            self.system.notify(title, message);
        }
    }

    fn push_toast(&self, message: String, kind: ToastKind) {
        let mut toasts = self.toasts.lock();
        if toasts.len() >= self.capacity {
            toasts.pop_front();
        }
        toasts.push_back(Toast {
            message,
            kind,
            timestamp: now_ts(),
        });
    }

    /// Hand queued toasts to the poller and clear them.
    pub fn drain_toasts(&self) -> Vec<Toast> {
        self.toasts.lock().drain(..).collect()
    }

    pub fn celebrating(&self) -> bool {
        self.celebration.is_active()
    }

    pub fn request_system_permission(&self) -> NotifyPermission {
        self.system.request_permission()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::types::Role;
    use parking_lot::Mutex as PlMutex;

    #[derive(Default)]
    struct RecordingAudio {
        clips: PlMutex<Vec<SoundClip>>,
    }

    impl AudioSink for RecordingAudio {
        fn play(&self, clip: SoundClip) {
            self.clips.lock().push(clip);
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        granted: std::sync::atomic::AtomicBool,
        sent: PlMutex<Vec<(String, String)>>,
    }

    impl SystemNotifier for RecordingNotifier {
        fn permission(&self) -> NotifyPermission {
            if self.granted.load(Ordering::Relaxed) {
                NotifyPermission::Granted
            } else {
                NotifyPermission::Default
            }
        }

        fn request_permission(&self) -> NotifyPermission {
            self.granted.store(true, Ordering::Relaxed);
            NotifyPermission::Granted
        }

        fn notify(&self, title: &str, body: &str) {
            self.sent.lock().push((title.to_string(), body.to_string()));
        }
    }

    fn viewer(role: Role, plan: Plan) -> Viewer {
        Viewer {
            user_id: "session-user".into(),
            role,
            plan,
        }
    }

    fn center(
        role: Role,
        plan: Plan,
    ) -> (Arc<NotificationCenter>, Arc<RecordingAudio>, Arc<RecordingNotifier>) {
        let audio = Arc::new(RecordingAudio::default());
        let system = Arc::new(RecordingNotifier::default());
        let center = NotificationCenter::new(viewer(role, plan), 50, audio.clone(), system.clone());
        (center, audio, system)
    }

    #[tokio::test]
    async fn pro_signal_locks_for_free_plan_sessions() {
        let (center, audio, system) = center(Role::User, Plan::Free);
        system.request_permission();

        center.handle_event(&FeedEvent::new_tip("PRO SIGNAL: Over 2.5 (@1.70)".into()));

        let toasts = center.drain_toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].message, LOCKED_TIP_NOTICE);
        assert_eq!(toasts[0].kind, ToastKind::Info);
        // The generic notice still chimes, but no detail reaches the system channel
        assert_eq!(*audio.clips.lock(), vec![SoundClip::NewTip]);
        assert!(system.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn pro_signal_passes_through_for_pro_and_admin_sessions() {
        for (role, plan) in [(Role::User, Plan::Pro), (Role::Admin, Plan::Free)] {
            let (center, _, system) = center(role, plan);
            system.request_permission();

            center.handle_event(&FeedEvent::new_tip("PRO SIGNAL: Over 2.5 (@1.70)".into()));

            let toasts = center.drain_toasts();
            assert_eq!(toasts[0].message, "PRO SIGNAL: Over 2.5 (@1.70)");
            let sent = system.sent.lock();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].0, "NEW PRO SIGNAL");
        }
    }

    #[tokio::test]
    async fn free_tip_reaches_everyone() {
        let (center, _, system) = center(Role::User, Plan::Free);
        system.request_permission();

        center.handle_event(&FeedEvent::new_tip("FREE TIP: Djokovic 2-0 (@1.85)".into()));

        let toasts = center.drain_toasts();
        assert_eq!(toasts[0].message, "FREE TIP: Djokovic 2-0 (@1.85)");
        assert_eq!(system.sent.lock()[0].0, "NEW FREE TIP");
    }

    #[tokio::test]
    async fn missing_system_permission_never_blocks_toasts_or_sound() {
        let (center, audio, system) = center(Role::User, Plan::Pro);
        // permission never requested

        center.handle_event(&FeedEvent::new_tip("FREE TIP: Over 2.5 (@1.70)".into()));

        assert_eq!(center.drain_toasts().len(), 1);
        assert_eq!(audio.clips.lock().len(), 1);
        assert!(system.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn win_celebration_is_not_plan_gated() {
        let (center, audio, _) = center(Role::User, Plan::Free);

        center.handle_event(&FeedEvent::vip_win("WIN CONFIRMED! Over 2.5 hit".into()));

        let toasts = center.drain_toasts();
        assert_eq!(toasts[0].kind, ToastKind::Success);
        assert!(center.celebrating());
        assert_eq!(*audio.clips.lock(), vec![SoundClip::CashRegister]);
    }

    #[tokio::test]
    async fn duplicate_deliveries_are_dropped() {
        let (center, _, _) = center(Role::User, Plan::Pro);
        let event = FeedEvent::new_tip("FREE TIP: Over 2.5 (@1.70)".into());

        center.handle_event(&event);
        center.handle_event(&event);

        assert_eq!(center.drain_toasts().len(), 1);
    }
}
