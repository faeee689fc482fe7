//! Room View Synchronizer
//!
//! `RoomView` is the client-side display cache of one room. It forwards local
//! intents to the server as [`ClientRequest`]s and folds pushed
//! [`ServerEvent`]s into an ordered list of rows.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  RoomView                                                       │
//! │  ├── session: SessionState                                      │
//! │  │   ├── room: current room (at most one)                       │
//! │  │   ├── editing: pending edit (at most one)                    │
//! │  │   └── typing: debounce timer                                 │
//! │  ├── rows: RowList (display order + id index)                   │
//! │  ├── form: EntryForm (draft, enabled after join)                │
//! │  ├── indicator: TypingIndicator (last writer wins)              │
//! │  ├── toasts: ToastStack (auto-dismissing)                       │
//! │  └── outbound: UnboundedSender<ClientRequest>                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows never change on a local intent. Only server events patch them.
//! Invalid input (empty text, unknown room) and events for ids that are not
//! rendered are ignored without error.

use chrono::NaiveDate;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::ViewConfig;
use crate::form::{DueChange, EntryForm, PendingEdit};
use crate::protocol::{ClientRequest, ServerEvent};
use crate::rows::{RenderedRow, RowList};
use crate::toast::{format_notification, ToastPhase, ToastStack};
use crate::types::{RoomName, Task, TaskId};
use crate::typing::{TypingDebounce, TypingIndicator};

/// Per-session mutable state, torn down on every room switch
#[derive(Debug)]
struct SessionState {
    room: Option<RoomName>,
    editing: Option<PendingEdit>,
    typing: TypingDebounce,
}

/// Client-side synchronizer for one joined room
pub struct RoomView {
    config: ViewConfig,
    session: SessionState,
    rows: RowList,
    form: EntryForm,
    indicator: TypingIndicator,
    toasts: ToastStack,
    today: NaiveDate,
    revision: u64,
    fading_seen: usize,
    outbound: mpsc::UnboundedSender<ClientRequest>,
}

impl RoomView {
    /// Create a view that sends requests into `outbound`
    ///
    /// Due dates are classified against the local calendar date.
    pub fn new(config: ViewConfig, outbound: mpsc::UnboundedSender<ClientRequest>) -> Self {
        let today = chrono::Local::now().date_naive();
        Self::with_today(config, outbound, today)
    }

    /// Create a view with an explicit "today" for due-date classification
    pub fn with_today(
        config: ViewConfig,
        outbound: mpsc::UnboundedSender<ClientRequest>,
        today: NaiveDate,
    ) -> Self {
        let session = SessionState {
            room: None,
            editing: None,
            typing: TypingDebounce::new(config.typing_idle),
        };
        let toasts = ToastStack::new(config.toast_fade_after, config.toast_ttl);
        Self {
            config,
            session,
            rows: RowList::new(),
            form: EntryForm::default(),
            indicator: TypingIndicator::default(),
            toasts,
            today,
            revision: 0,
            fading_seen: 0,
            outbound,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn username(&self) -> &str {
        &self.config.username
    }

    pub fn current_room(&self) -> Option<&RoomName> {
        self.session.room.as_ref()
    }

    pub fn rows(&self) -> &RowList {
        &self.rows
    }

    pub fn row(&self, id: &TaskId) -> Option<&RenderedRow> {
        self.rows.get(id)
    }

    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    /// Whether the task entry controls accept input
    pub fn controls_enabled(&self) -> bool {
        self.form.is_enabled()
    }

    pub fn pending_edit(&self) -> Option<&PendingEdit> {
        self.session.editing.as_ref()
    }

    pub fn typing_indicator(&self) -> Option<String> {
        self.indicator.text()
    }

    pub fn is_typing(&self) -> bool {
        self.session.typing.is_armed()
    }

    pub fn toasts(&self) -> &ToastStack {
        &self.toasts
    }

    /// Live toast texts with a fading flag
    pub fn live_toasts(&self, now: Instant) -> Vec<(String, ToastPhase)> {
        self.toasts
            .live(now)
            .map(|(toast, phase)| (toast.text.clone(), phase))
            .collect()
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Counter bumped on every visible change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ------------------------------------------------------------------
    // Local intents
    // ------------------------------------------------------------------

    /// Join a room, discarding everything rendered for the previous one
    ///
    /// No-op when the name is empty or not one of the user's rooms.
    pub fn join_room(&mut self, room: impl Into<RoomName>) -> Option<ClientRequest> {
        let room = room.into();
        if !self.config.allows(&room) {
            debug!(room = %room, "Ignoring join of unknown or empty room");
            return None;
        }

        if let Some(previous) = self.session.room.take() {
            if self.session.typing.cancel() {
                self.emit(ClientRequest::StopTyping {
                    room: previous.clone(),
                    username: self.config.username.clone(),
                });
            }
            debug!(from = %previous, to = %room, "Switching rooms");
        }

        self.rows.clear();
        self.session.editing = None;
        self.session.typing.cancel();
        self.indicator.clear();
        self.form.clear();
        self.form.enable();
        self.session.room = Some(room.clone());
        self.touch();

        info!(room = %room, user = %self.config.username, "Joining room");
        Some(self.emit(ClientRequest::JoinRoom {
            room,
            username: self.config.username.clone(),
        }))
    }

    /// Keystroke in the task entry fields
    ///
    /// Updates the draft, announces typing and re-arms the debounce.
    pub fn on_input(
        &mut self,
        text: impl Into<String>,
        due_date: Option<NaiveDate>,
        now: Instant,
    ) -> Option<ClientRequest> {
        self.form.set_draft(text, due_date);
        self.touch();

        let room = self.session.room.clone()?;
        self.session.typing.arm(now);
        Some(self.emit(ClientRequest::Typing {
            room,
            username: self.config.username.clone(),
        }))
    }

    /// Submit whatever is in the entry form
    pub fn submit_draft(&mut self) -> Option<ClientRequest> {
        let text = self.form.text.clone();
        let due_date = self.form.due_date;
        self.submit_task(&text, due_date)
    }

    /// Ask the server to add a task
    ///
    /// Rejects text that trims to empty. The entry form is cleared right away,
    /// whether or not the server ever acknowledges.
    pub fn submit_task(&mut self, text: &str, due_date: Option<NaiveDate>) -> Option<ClientRequest> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let room = self.session.room.clone()?;

        self.form.clear();
        self.touch();
        Some(self.emit(ClientRequest::AddTask {
            room,
            username: self.config.username.clone(),
            text: text.to_string(),
            due_date,
        }))
    }

    /// Ask the server to remove a task
    pub fn remove_task(&mut self, id: TaskId) -> Option<ClientRequest> {
        let room = self.session.room.clone()?;
        Some(self.emit(ClientRequest::RemoveTask {
            room,
            username: self.config.username.clone(),
            id,
        }))
    }

    /// Ask the server to flip a task's completion state
    pub fn toggle_task(&mut self, id: TaskId) -> Option<ClientRequest> {
        let room = self.session.room.clone()?;
        Some(self.emit(ClientRequest::ToggleDone {
            room,
            username: self.config.username.clone(),
            id,
        }))
    }

    /// Open the edit session for a rendered row
    ///
    /// Replaces any edit already open. Returns `false` for ids not on screen.
    pub fn begin_edit(&mut self, id: &TaskId) -> bool {
        let Some(row) = self.rows.get(id) else {
            return false;
        };
        self.session.editing = Some(PendingEdit::new(id.clone(), row.text(), row.due_date()));
        self.touch();
        true
    }

    /// Send the pending edit to the server and close the session
    ///
    /// `due` is resolved against the date the session was opened with, so a
    /// text-only edit keeps the task's due date. Empty text leaves the session
    /// open and sends nothing.
    pub fn confirm_edit(&mut self, text: &str, due: DueChange) -> Option<ClientRequest> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let room = self.session.room.clone()?;
        let editing = self.session.editing.take()?;
        let due_date = due.resolve(editing.due_date);

        self.touch();
        Some(self.emit(ClientRequest::EditTask {
            room,
            username: self.config.username.clone(),
            id: editing.id,
            text: text.to_string(),
            due_date,
        }))
    }

    /// Discard the pending edit without contacting the server
    pub fn cancel_edit(&mut self) -> bool {
        let cancelled = self.session.editing.take().is_some();
        if cancelled {
            self.touch();
        }
        cancelled
    }

    // ------------------------------------------------------------------
    // Server events
    // ------------------------------------------------------------------

    /// Apply one pushed event; returns whether anything visible changed
    pub fn on_event(&mut self, event: ServerEvent, now: Instant) -> bool {
        if self.session.room.is_none() && !matches!(event, ServerEvent::Notification { .. }) {
            debug!(event = event.name(), "Ignoring room event before any join");
            return false;
        }

        match event {
            ServerEvent::RoomData { tasks } => {
                self.on_snapshot(tasks);
                true
            }
            ServerEvent::TaskAdded(task) => {
                self.on_task_added(task);
                true
            }
            ServerEvent::TaskRemoved { id } => self.on_task_removed(&id),
            ServerEvent::TaskToggled { id, done } => self.on_task_toggled(&id, done),
            ServerEvent::TaskEdited { id, text, due_date } => {
                self.on_task_edited(&id, text, due_date)
            }
            ServerEvent::Notification { message, username } => {
                self.on_notification(&message, username.as_deref(), now);
                true
            }
            ServerEvent::UserTyping { username } => {
                self.on_typing(username);
                true
            }
            ServerEvent::UserStopTyping {} => self.on_stop_typing(),
        }
    }

    /// Replace the entire list with the room's snapshot
    pub fn on_snapshot(&mut self, tasks: Vec<Task>) {
        debug!(count = tasks.len(), "Applying room snapshot");
        self.rows.replace_all(tasks, self.today);
        self.drop_stale_edit();
        self.touch();
    }

    /// Insert a new row, or re-render the existing row for a repeated id
    pub fn on_task_added(&mut self, task: Task) {
        if !self.rows.upsert(task, self.today) {
            debug!("Duplicate task_added re-rendered in place");
        }
        self.touch();
    }

    pub fn on_task_removed(&mut self, id: &TaskId) -> bool {
        if self.rows.remove(id).is_none() {
            debug!(id = %id, "Ignoring task_removed for unrendered task");
            return false;
        }
        self.drop_stale_edit();
        self.touch();
        true
    }

    pub fn on_task_toggled(&mut self, id: &TaskId, done: bool) -> bool {
        if !self.rows.set_done(id, done) {
            debug!(id = %id, "Ignoring task_toggled for unrendered task");
            return false;
        }
        self.touch();
        true
    }

    pub fn on_task_edited(&mut self, id: &TaskId, text: String, due_date: Option<NaiveDate>) -> bool {
        if !self.rows.edit(id, text, due_date, self.today) {
            debug!(id = %id, "Ignoring task_edited for unrendered task");
            return false;
        }
        self.touch();
        true
    }

    /// Show an auto-dismissing toast
    pub fn on_notification(&mut self, message: &str, username: Option<&str>, now: Instant) {
        self.toasts.push(format_notification(message, username), now);
        self.touch();
    }

    pub fn on_typing(&mut self, username: impl Into<String>) {
        self.indicator.show(username);
        self.touch();
    }

    pub fn on_stop_typing(&mut self) -> bool {
        let cleared = self.indicator.clear();
        if cleared {
            self.touch();
        }
        cleared
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Earliest instant at which [`on_tick`](Self::on_tick) has work to do
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        match (self.session.typing.deadline(), self.toasts.next_deadline(now)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fire due timers: the typing debounce and toast fade/expiry
    pub fn on_tick(&mut self, now: Instant) -> Option<ClientRequest> {
        if self.toasts.prune(now) > 0 {
            self.touch();
        }
        let fading = self
            .toasts
            .live(now)
            .filter(|(_, phase)| *phase == ToastPhase::Fading)
            .count();
        if fading != self.fading_seen {
            self.fading_seen = fading;
            self.touch();
        }

        if !self.session.typing.fire(now) {
            return None;
        }
        let room = self.session.room.clone()?;
        Some(self.emit(ClientRequest::StopTyping {
            room,
            username: self.config.username.clone(),
        }))
    }

    /// Reclassify every row against a new calendar day
    pub fn reclassify(&mut self, today: NaiveDate) {
        if today == self.today {
            return;
        }
        self.today = today;
        self.rows.reclassify(today);
        self.touch();
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Close the edit session if its task is no longer rendered
    fn drop_stale_edit(&mut self) {
        let stale = self
            .session
            .editing
            .as_ref()
            .is_some_and(|edit| !self.rows.contains(&edit.id));
        if stale {
            debug!("Closing edit session for a task that is gone");
            self.session.editing = None;
        }
    }

    /// Hand a request to the transport; a closed channel drops it
    fn emit(&self, request: ClientRequest) -> ClientRequest {
        if self.outbound.send(request.clone()).is_err() {
            warn!(request = request.name(), "Outbound channel closed, dropping request");
        }
        request
    }
}
