//! Win celebration effect — a flag that raises on trigger and clears itself
//! after a fixed window.
//!
//! Overlapping triggers must not leave the effect stuck on: each trigger
//! bumps a generation counter and only the matching reset clears the flag,
//! so the last timer wins and the effect always self-terminates.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How long the effect stays up per trigger.
pub const CELEBRATION_SECS: u64 = 5;

#[derive(Default)]
struct State {
    active: AtomicBool,
    generation: AtomicU64,
}

/// Cheap cloneable handle to one session's celebration state.
#[derive(Clone, Default)]
pub struct Celebration {
    state: Arc<State>,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the effect and schedule its reset.
    pub fn trigger(&self) {
        let generation = self.state.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.active.store(true, Ordering::SeqCst);

        let state = self.state.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(CELEBRATION_SECS)).await;
            // A newer trigger owns the reset now
            if state.generation.load(Ordering::SeqCst) == generation {
                state.active.store(false, Ordering::SeqCst);
            }
        });
    }

    pub fn is_active(&self) -> bool {
        self.state.active.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn advance(secs: u64) {
        // Let any freshly-spawned reset task be polled so it arms its sleep
        // timer at the current virtual time before we move the clock.
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        tokio::time::advance(Duration::from_secs(secs)).await;
        // Let the reset task run if its timer elapsed
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn effect_self_terminates_after_the_window() {
        let celebration = Celebration::new();
        assert!(!celebration.is_active());

        celebration.trigger();
        assert!(celebration.is_active());

        advance(CELEBRATION_SECS - 1).await;
        assert!(celebration.is_active());

        advance(2).await;
        assert!(!celebration.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_triggers_extend_and_still_terminate() {
        let celebration = Celebration::new();
        celebration.trigger();

        advance(3).await;
        celebration.trigger();

        // First timer elapses but a newer generation owns the flag
        advance(3).await;
        assert!(celebration.is_active());

        // Second window runs out
        advance(3).await;
        assert!(!celebration.is_active());
    }
}
