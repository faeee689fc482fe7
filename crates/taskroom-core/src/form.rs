//! Local input state: the task entry form and the single edit session

use chrono::NaiveDate;

use crate::types::TaskId;

/// Task entry form (text plus optional due date)
///
/// Disabled until a room is joined. Cleared as soon as a task is submitted,
/// without waiting for the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub text: String,
    pub due_date: Option<NaiveDate>,
    enabled: bool,
}

impl EntryForm {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Replace the draft with what the user has typed so far
    pub fn set_draft(&mut self, text: impl Into<String>, due_date: Option<NaiveDate>) {
        self.text = text.into();
        self.due_date = due_date;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.due_date = None;
    }
}

/// Uncommitted edit of one task
///
/// At most one exists per client. It holds the user's input until the edit
/// is confirmed (sent to the server) or cancelled (discarded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    /// Task being edited
    pub id: TaskId,
    /// Text in the edit field
    pub text: String,
    /// Due date in the edit field
    pub due_date: Option<NaiveDate>,
}

impl PendingEdit {
    pub fn new(id: TaskId, text: impl Into<String>, due_date: Option<NaiveDate>) -> Self {
        Self {
            id,
            text: text.into(),
            due_date,
        }
    }
}

/// What confirming an edit does to the task's due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DueChange {
    /// Keep the date the edit session was opened with
    #[default]
    Keep,
    Set(NaiveDate),
    Clear,
}

impl DueChange {
    /// Due date to send, given the one in the edit session
    pub fn resolve(self, current: Option<NaiveDate>) -> Option<NaiveDate> {
        match self {
            DueChange::Keep => current,
            DueChange::Set(date) => Some(date),
            DueChange::Clear => None,
        }
    }
}
