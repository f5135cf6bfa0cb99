//! Cross-session event broadcast — tokio::broadcast channel fanning tip
//! signals out to every registered session.
//!
//! Events are ephemeral: a session that is not subscribed when an event is
//! published never sees it (no backfill), and delivery is best-effort.

use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::broadcast;

/// Marker substring embedded in pro-tip messages; receivers classify on it.
pub const PRO_MARKER: &str = "PRO";

/// Signals broadcast to all active sessions of the deployment.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedEvent {
    /// A new tip was posted to the shared feed.
    NewTip {
        event_id: i64,
        message: String,
        timestamp: f64,
    },
    /// A broadcast bet was confirmed as a win.
    VipWin {
        event_id: i64,
        message: String,
        timestamp: f64,
    },
}

impl FeedEvent {
    pub fn new_tip(message: String) -> Self {
        Self::NewTip {
            event_id: next_event_id(),
            message,
            timestamp: now_ts(),
        }
    }

    pub fn vip_win(message: String) -> Self {
        Self::VipWin {
            event_id: next_event_id(),
            message,
            timestamp: now_ts(),
        }
    }

    pub fn event_id(&self) -> i64 {
        match self {
            Self::NewTip { event_id, .. } | Self::VipWin { event_id, .. } => *event_id,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NewTip { message, .. } | Self::VipWin { message, .. } => message,
        }
    }
}

/// Does a tip message carry the pro classification marker?
pub fn is_pro_signal(message: &str) -> bool {
    message.contains(PRO_MARKER)
}

/// Central event bus for broadcasting events to all subscribers.
pub struct EventBus {
    tx: broadcast::Sender<FeedEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: FeedEvent) {
        // Ignore error if no subscribers
        let _ = self.tx.send(event);
    }

    /// Subscribe to events.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.tx.subscribe()
    }

    /// Get current subscriber count.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Current unix time in seconds.
pub fn now_ts() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Unique, monotonically increasing event id (epoch millis, bumped on ties).
fn next_event_id() -> i64 {
    static LAST: AtomicI64 = AtomicI64::new(0);
    let millis = (now_ts() * 1000.0) as i64;
    LAST.fetch_max(millis, Ordering::Relaxed);
    // Ties within the same millisecond still get distinct ids
    LAST.fetch_add(1, Ordering::Relaxed) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_ids_are_unique_and_increasing() {
        let a = FeedEvent::new_tip("PRO SIGNAL: test".into());
        let b = FeedEvent::vip_win("WIN".into());
        assert!(b.event_id() > a.event_id());
    }

    #[test]
    fn pro_marker_classification() {
        assert!(is_pro_signal("PRO SIGNAL: Lakers -5.5 (@1.90)"));
        assert!(!is_pro_signal("FREE TIP: Over 2.5 (@1.70)"));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_not_an_error() {
        let bus = EventBus::new(16);
        bus.publish(FeedEvent::new_tip("FREE TIP: test".into()));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        bus.publish(FeedEvent::vip_win("WIN CONFIRMED! test hit".into()));
        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.message(), "WIN CONFIRMED! test hit");
    }
}
