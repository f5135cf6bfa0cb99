//! Side-effect sinks — audio and system-notification channels.
//!
//! Both are fire-and-forget: a failed delivery is logged and dropped,
//! never surfaced to the caller. The system channel is additive; missing
//! permission must not block in-app toasts or sound.

use std::sync::atomic::{AtomicU8, Ordering};
use tracing::debug;

/// The two clips the tracker plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundClip {
    /// Soft chime for an incoming tip.
    NewTip,
    /// Cash register for a confirmed win.
    CashRegister,
}

impl SoundClip {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewTip => "new_tip",
            Self::CashRegister => "cash_register",
        }
    }
}

pub trait AudioSink: Send + Sync {
    fn play(&self, clip: SoundClip);
}

/// Default audio sink — the service has no speakers; emit a log line the
/// front end can mirror.
pub struct LogAudioSink;

impl AudioSink for LogAudioSink {
    fn play(&self, clip: SoundClip) {
        debug!(clip = clip.as_str(), "sound effect");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyPermission {
    Default,
    Granted,
    Denied,
}

impl NotifyPermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Granted,
            2 => Self::Denied,
            _ => Self::Default,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Default => 0,
            Self::Granted => 1,
            Self::Denied => 2,
        }
    }
}

pub trait SystemNotifier: Send + Sync {
    fn permission(&self) -> NotifyPermission;
    /// Ask for the capability; idempotent.
    fn request_permission(&self) -> NotifyPermission;
    /// Deliver a notification. Only called when permission is granted.
    fn notify(&self, title: &str, body: &str);
}

/// System channel that pushes to a configured webhook. Permission is granted
/// on the first request; delivery errors are swallowed.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    permission: AtomicU8,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            permission: AtomicU8::new(NotifyPermission::Default.as_u8()),
        }
    }
}

impl SystemNotifier for WebhookNotifier {
    fn permission(&self) -> NotifyPermission {
        NotifyPermission::from_u8(self.permission.load(Ordering::Relaxed))
    }

    fn request_permission(&self) -> NotifyPermission {
        self.permission
            .store(NotifyPermission::Granted.as_u8(), Ordering::Relaxed);
        NotifyPermission::Granted
    }

    fn notify(&self, title: &str, body: &str) {
        let client = self.client.clone();
        let url = self.url.clone();
        let payload = serde_json::json!({ "title": title, "body": body });
        tokio::spawn(async move {
            if let Err(e) = client.post(&url).json(&payload).send().await {
                debug!(error = %e, "webhook notification dropped");
            }
        });
    }
}

/// System channel for deployments without a webhook: permission stays denied
/// and nothing is delivered.
pub struct NoopNotifier;

impl SystemNotifier for NoopNotifier {
    fn permission(&self) -> NotifyPermission {
        NotifyPermission::Default
    }

    fn request_permission(&self) -> NotifyPermission {
        NotifyPermission::Denied
    }

    fn notify(&self, _title: &str, _body: &str) {}
}
