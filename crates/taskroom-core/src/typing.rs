//! Typing presence: outbound debounce and inbound indicator

use std::time::Duration;

use tokio::time::Instant;

/// Quiet period after the last keystroke before "stop typing" is sent
pub const DEFAULT_TYPING_IDLE: Duration = Duration::from_millis(1500);

/// Debounce timer for the local user's typing signal
///
/// Every input re-arms the deadline; "stop typing" fires once the deadline
/// passes with no further input. This is the only cancellable timer in a
/// view.
#[derive(Debug, Clone)]
pub struct TypingDebounce {
    idle: Duration,
    deadline: Option<Instant>,
}

impl TypingDebounce {
    pub fn new(idle: Duration) -> Self {
        Self {
            idle,
            deadline: None,
        }
    }

    /// Cancel any pending deadline and schedule a new one from `now`
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.idle);
    }

    /// Cancel the pending deadline; returns whether one was armed
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the deadline if it has passed
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for TypingDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_IDLE)
    }
}

/// Single-line indicator of who else is typing
///
/// Shows one typer at a time; the most recent `user_typing` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingIndicator {
    typer: Option<String>,
}

impl TypingIndicator {
    pub fn show(&mut self, username: impl Into<String>) {
        self.typer = Some(username.into());
    }

    /// Clear the indicator; returns whether anything was shown
    pub fn clear(&mut self) -> bool {
        self.typer.take().is_some()
    }

    /// Indicator text, e.g. `ada is typing...`
    pub fn text(&self) -> Option<String> {
        self.typer.as_ref().map(|name| format!("{} is typing...", name))
    }
}
