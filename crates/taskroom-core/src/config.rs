//! View configuration

use std::time::Duration;

use crate::toast::{DEFAULT_TOAST_FADE_AFTER, DEFAULT_TOAST_TTL};
use crate::types::RoomName;
use crate::typing::DEFAULT_TYPING_IDLE;

/// Settings for one [`RoomView`](crate::view::RoomView)
///
/// The username is injected by whoever authenticated the session; the view
/// never manages identity itself.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Acting user, stamped on every outbound request
    pub username: String,
    /// Rooms the user may join. An empty list accepts any non-empty name.
    pub rooms: Vec<RoomName>,
    /// Quiet period before "stop typing" is sent
    pub typing_idle: Duration,
    /// Time a toast stays fully visible
    pub toast_fade_after: Duration,
    /// Time after which a toast is removed
    pub toast_ttl: Duration,
}

impl ViewConfig {
    /// Create a config with default timings
    pub fn new<I, R>(username: impl Into<String>, rooms: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RoomName>,
    {
        // Drop blanks and repeats, keeping first-seen order
        let mut unique: Vec<RoomName> = Vec::new();
        for room in rooms.into_iter().map(Into::into) {
            if !room.is_empty() && !unique.contains(&room) {
                unique.push(room);
            }
        }

        Self {
            username: username.into(),
            rooms: unique,
            typing_idle: DEFAULT_TYPING_IDLE,
            toast_fade_after: DEFAULT_TOAST_FADE_AFTER,
            toast_ttl: DEFAULT_TOAST_TTL,
        }
    }

    pub fn with_typing_idle(mut self, idle: Duration) -> Self {
        self.typing_idle = idle;
        self
    }

    pub fn with_toast_timing(mut self, fade_after: Duration, ttl: Duration) -> Self {
        self.toast_fade_after = fade_after;
        self.toast_ttl = ttl;
        self
    }

    /// Whether `room` is one of the selectable rooms
    pub fn allows(&self, room: &RoomName) -> bool {
        !room.is_empty() && (self.rooms.is_empty() || self.rooms.contains(room))
    }
}
