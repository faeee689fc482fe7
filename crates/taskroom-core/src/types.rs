//! Core types for Taskroom

use std::convert::Infallible;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a task, assigned by the server
///
/// Servers key tasks by integer row id or by string key; both appear on the
/// wire as bare JSON values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    /// Integer key (e.g. a database row id)
    Num(i64),
    /// Opaque string key
    Key(String),
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        TaskId::Num(id)
    }
}

impl From<i32> for TaskId {
    fn from(id: i32) -> Self {
        TaskId::Num(id.into())
    }
}

impl From<&str> for TaskId {
    fn from(key: &str) -> Self {
        key.parse().unwrap_or_else(|never: Infallible| match never {})
    }
}

/// Numeric strings become [`TaskId::Num`], anything else a [`TaskId::Key`].
impl FromStr for TaskId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(n) => TaskId::Num(n),
            Err(_) => TaskId::Key(s.to_string()),
        })
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskId::Num(n) => f.pad(&n.to_string()),
            TaskId::Key(k) => f.pad(k),
        }
    }
}

/// Name of a room (shared task list)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomName(String);

impl RoomName {
    /// Create a room name, trimming surrounding whitespace
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_string())
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name is empty after trimming
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for RoomName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for RoomName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for RoomName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task in a room, as sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier
    pub id: TaskId,
    /// Task description
    pub text: String,
    /// Whether the task is completed
    #[serde(default)]
    pub done: bool,
    /// Optional due date (`YYYY-MM-DD` on the wire)
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Username of the creator
    pub created_by: String,
    /// Username of the last editor, if any
    #[serde(default)]
    pub last_modified_by: Option<String>,
}

impl Task {
    /// Create a task owned by `created_by`
    pub fn new(id: impl Into<TaskId>, text: impl Into<String>, created_by: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            done: false,
            due_date: None,
            created_by: created_by.into(),
            last_modified_by: None,
        }
    }

    /// Set the due date
    pub fn with_due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the last editor
    pub fn with_editor(mut self, editor: impl Into<String>) -> Self {
        self.last_modified_by = Some(editor.into());
        self
    }

    /// Attribution line: creator, plus the last editor when it differs
    pub fn attribution(&self) -> String {
        match self.last_modified_by.as_deref() {
            Some(editor) if !editor.is_empty() && editor != self.created_by => {
                format!("Created by {}, last edited by {}", self.created_by, editor)
            }
            _ => format!("Created by {}", self.created_by),
        }
    }

    /// Due line, present only for dated tasks
    pub fn due_line(&self) -> Option<String> {
        self.due_date.map(|d| format!("Due: {}", d.format("%Y-%m-%d")))
    }
}
