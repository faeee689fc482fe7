//! Cooperative session driver
//!
//! Runs one [`RoomView`] on a single task, interleaving local intents,
//! server events and the view's own timers. Renderers watch a
//! [`ViewSnapshot`] that is republished after every visible change.
//!
//! ```text
//!   intents ─────┐
//!   events  ─────┼──> select! ──> RoomView ──> outbound (ClientRequest)
//!   deadline ────┘                   │
//!                                    └──> watch<ViewSnapshot>
//! ```

use std::future;

use chrono::NaiveDate;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::form::{DueChange, PendingEdit};
use crate::protocol::{ClientRequest, ServerEvent};
use crate::rows::RenderedRow;
use crate::toast::ToastPhase;
use crate::types::{RoomName, TaskId};
use crate::view::RoomView;

/// A local user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Switch to a room
    Join(RoomName),
    /// Keystroke in the task entry fields
    Input {
        text: String,
        due_date: Option<NaiveDate>,
    },
    /// Submit explicit text as a new task
    Submit {
        text: String,
        due_date: Option<NaiveDate>,
    },
    /// Submit whatever is in the entry form
    SubmitDraft,
    Remove(TaskId),
    Toggle(TaskId),
    BeginEdit(TaskId),
    ConfirmEdit {
        text: String,
        due: DueChange,
    },
    CancelEdit,
}

impl RoomView {
    /// Apply a local intent at `now`
    pub fn apply_intent(&mut self, intent: Intent, now: Instant) -> Option<ClientRequest> {
        match intent {
            Intent::Join(room) => self.join_room(room),
            Intent::Input { text, due_date } => self.on_input(text, due_date, now),
            Intent::Submit { text, due_date } => self.submit_task(&text, due_date),
            Intent::SubmitDraft => self.submit_draft(),
            Intent::Remove(id) => self.remove_task(id),
            Intent::Toggle(id) => self.toggle_task(id),
            Intent::BeginEdit(id) => {
                self.begin_edit(&id);
                None
            }
            Intent::ConfirmEdit { text, due } => self.confirm_edit(&text, due),
            Intent::CancelEdit => {
                self.cancel_edit();
                None
            }
        }
    }

    /// Owned copy of everything a renderer needs
    pub fn snapshot(&self, now: Instant) -> ViewSnapshot {
        ViewSnapshot {
            revision: self.revision(),
            username: self.username().to_string(),
            room: self.current_room().cloned(),
            controls_enabled: self.controls_enabled(),
            rows: self.rows().iter().cloned().collect(),
            typing: self.typing_indicator(),
            toasts: self.live_toasts(now),
            editing: self.pending_edit().cloned(),
            today: self.today(),
        }
    }
}

/// Render-ready state of a view at one revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub revision: u64,
    pub username: String,
    pub room: Option<RoomName>,
    pub controls_enabled: bool,
    pub rows: Vec<RenderedRow>,
    pub typing: Option<String>,
    pub toasts: Vec<(String, ToastPhase)>,
    pub editing: Option<PendingEdit>,
    pub today: NaiveDate,
}

impl ViewSnapshot {
    /// Ids in display order
    pub fn ids(&self) -> Vec<TaskId> {
        self.rows.iter().map(|row| row.id().clone()).collect()
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}

/// Drive a view until both input channels close
///
/// Every mutation happens on this task, so intents, events and timers never
/// interleave inside a single step. Returns the view for inspection.
pub async fn run(
    mut view: RoomView,
    mut intents: mpsc::Receiver<Intent>,
    mut events: mpsc::Receiver<ServerEvent>,
    updates: watch::Sender<ViewSnapshot>,
) -> RoomView {
    let mut intents_open = true;
    let mut events_open = true;
    let mut published = None;

    while intents_open || events_open {
        let deadline = view.next_deadline(Instant::now());

        tokio::select! {
            intent = intents.recv(), if intents_open => match intent {
                Some(intent) => {
                    view.apply_intent(intent, Instant::now());
                }
                None => {
                    debug!("Intent channel closed");
                    intents_open = false;
                }
            },
            event = events.recv(), if events_open => match event {
                Some(event) => {
                    view.on_event(event, Instant::now());
                }
                None => {
                    debug!("Event channel closed");
                    events_open = false;
                }
            },
            _ = wait_until(deadline) => {
                view.on_tick(Instant::now());
            }
        }

        view.reclassify(chrono::Local::now().date_naive());

        if published != Some(view.revision()) {
            published = Some(view.revision());
            updates.send_replace(view.snapshot(Instant::now()));
        }
    }

    view
}
