//! Ephemeral notification toasts
//!
//! A toast is visible for `fade_after`, then fades, then disappears at `ttl`.
//! Nothing accumulates: every toast is pruned once its lifetime is over.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

/// Time a toast stays fully visible
pub const DEFAULT_TOAST_FADE_AFTER: Duration = Duration::from_millis(2500);

/// Time after which a toast is removed
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(3000);

/// Label used when a notification has no username
pub const ANONYMOUS_LABEL: &str = "Someone";

/// Format a server notification for display
pub fn format_notification(message: &str, username: Option<&str>) -> String {
    let who = username.filter(|name| !name.is_empty()).unwrap_or(ANONYMOUS_LABEL);
    format!("{}: {}", who, message)
}

/// One displayed notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub text: String,
    pub shown_at: Instant,
}

/// Display phase of a live toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Fading,
}

/// Stack of live toasts, oldest first
#[derive(Debug, Clone)]
pub struct ToastStack {
    toasts: VecDeque<Toast>,
    next_id: u64,
    fade_after: Duration,
    ttl: Duration,
}

impl ToastStack {
    pub fn new(fade_after: Duration, ttl: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            next_id: 0,
            fade_after: fade_after.min(ttl),
            ttl,
        }
    }

    /// Show a toast; returns its id
    pub fn push(&mut self, text: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push_back(Toast {
            id,
            text: text.into(),
            shown_at: now,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Phase of a toast at `now`, or `None` once it has expired
    pub fn phase(&self, toast: &Toast, now: Instant) -> Option<ToastPhase> {
        let age = now.saturating_duration_since(toast.shown_at);
        if age >= self.ttl {
            None
        } else if age >= self.fade_after {
            Some(ToastPhase::Fading)
        } else {
            Some(ToastPhase::Visible)
        }
    }

    /// Drop expired toasts; returns how many were removed
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        let ttl = self.ttl;
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < ttl);
        before - self.toasts.len()
    }

    /// Live toasts with their phase at `now`
    pub fn live(&self, now: Instant) -> impl Iterator<Item = (&Toast, ToastPhase)> {
        self.toasts
            .iter()
            .filter_map(move |toast| self.phase(toast, now).map(|phase| (toast, phase)))
    }

    /// Next instant at which some toast changes phase or expires
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        self.toasts
            .iter()
            .map(|toast| {
                let fade_at = toast.shown_at + self.fade_after;
                if fade_at > now {
                    fade_at
                } else {
                    toast.shown_at + self.ttl
                }
            })
            .min()
    }
}

impl Default for ToastStack {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_FADE_AFTER, DEFAULT_TOAST_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_notification() {
        assert_eq!(format_notification("joined", Some("ada")), "ada: joined");
        assert_eq!(format_notification("joined", None), "Someone: joined");
        assert_eq!(format_notification("joined", Some("")), "Someone: joined");
    }

    #[test]
    fn test_toast_lifecycle() {
        let start = Instant::now();
        let mut stack = ToastStack::default();
        stack.push("ada: hi", start);

        let phases: Vec<_> = stack.live(start).map(|(_, p)| p).collect();
        assert_eq!(phases, vec![ToastPhase::Visible]);

        let fading = start + Duration::from_millis(2600);
        let phases: Vec<_> = stack.live(fading).map(|(_, p)| p).collect();
        assert_eq!(phases, vec![ToastPhase::Fading]);

        let gone = start + Duration::from_millis(3000);
        assert_eq!(stack.live(gone).count(), 0);
        assert_eq!(stack.prune(gone), 1);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_next_deadline_tracks_fade_then_expiry() {
        let start = Instant::now();
        let mut stack = ToastStack::default();
        assert!(stack.next_deadline(start).is_none());

        stack.push("a", start);
        assert_eq!(
            stack.next_deadline(start),
            Some(start + DEFAULT_TOAST_FADE_AFTER)
        );
        assert_eq!(
            stack.next_deadline(start + DEFAULT_TOAST_FADE_AFTER),
            Some(start + DEFAULT_TOAST_TTL)
        );
    }

    #[test]
    fn test_ids_are_unique() {
        let now = Instant::now();
        let mut stack = ToastStack::default();
        let a = stack.push("a", now);
        let b = stack.push("b", now);
        assert_ne!(a, b);
        assert_eq!(stack.len(), 2);
    }
}
