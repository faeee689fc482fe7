//! Rendered rows of the current room
//!
//! `RowList` keeps display order and an id index side by side so incremental
//! events patch the matching row directly instead of scanning the list.
//! Each task id maps to at most one row.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::due::{sort_snapshot, DueStatus};
use crate::types::{Task, TaskId};

/// Display copy of one task plus its derived classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    task: Task,
    status: DueStatus,
}

impl RenderedRow {
    /// Render a task as of `today`
    pub fn new(task: Task, today: NaiveDate) -> Self {
        let status = DueStatus::classify(task.due_date, today);
        Self { task, status }
    }

    pub fn id(&self) -> &TaskId {
        &self.task.id
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn text(&self) -> &str {
        &self.task.text
    }

    /// Checked state; completed rows are drawn struck through
    pub fn is_done(&self) -> bool {
        self.task.done
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.task.due_date
    }

    pub fn status(&self) -> DueStatus {
        self.status
    }

    pub fn due_line(&self) -> Option<String> {
        self.task.due_line()
    }

    pub fn attribution(&self) -> String {
        self.task.attribution()
    }

    fn reclassify(&mut self, today: NaiveDate) {
        self.status = DueStatus::classify(self.task.due_date, today);
    }
}

/// Ordered rows of the current room with an id index
#[derive(Debug, Clone, Default)]
pub struct RowList {
    order: Vec<TaskId>,
    rows: HashMap<TaskId, RenderedRow>,
}

impl RowList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.rows.contains_key(id)
    }

    pub fn get(&self, id: &TaskId) -> Option<&RenderedRow> {
        self.rows.get(id)
    }

    /// Rows in display order
    pub fn iter(&self) -> impl Iterator<Item = &RenderedRow> {
        self.order.iter().filter_map(|id| self.rows.get(id))
    }

    /// Ids in display order
    pub fn ids(&self) -> Vec<TaskId> {
        self.order.clone()
    }

    /// Drop every row
    pub fn clear(&mut self) {
        self.order.clear();
        self.rows.clear();
    }

    /// Replace the whole list with a server snapshot, in display order
    ///
    /// A snapshot repeating an id keeps one row for it, holding the last copy.
    pub fn replace_all(&mut self, mut tasks: Vec<Task>, today: NaiveDate) {
        self.clear();
        sort_snapshot(&mut tasks);
        for task in tasks {
            self.upsert(task, today);
        }
    }

    /// Append a row, or re-render in place if the id is already shown
    ///
    /// Returns `true` when a new row was inserted.
    pub fn upsert(&mut self, task: Task, today: NaiveDate) -> bool {
        let id = task.id.clone();
        let row = RenderedRow::new(task, today);
        if self.rows.insert(id.clone(), row).is_some() {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Remove a row; unknown ids are ignored
    pub fn remove(&mut self, id: &TaskId) -> Option<RenderedRow> {
        let row = self.rows.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(row)
    }

    /// Set the checked state of a single row
    ///
    /// Returns `false` when the id is not rendered.
    pub fn set_done(&mut self, id: &TaskId, done: bool) -> bool {
        match self.rows.get_mut(id) {
            Some(row) => {
                row.task.done = done;
                true
            }
            None => false,
        }
    }

    /// Replace the text and due date of a single row and reclassify it
    ///
    /// Returns `false` when the id is not rendered.
    pub fn edit(
        &mut self,
        id: &TaskId,
        text: String,
        due_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> bool {
        match self.rows.get_mut(id) {
            Some(row) => {
                row.task.text = text;
                row.task.due_date = due_date;
                row.reclassify(today);
                true
            }
            None => false,
        }
    }

    /// Recompute every row's classification for a new day
    pub fn reclassify(&mut self, today: NaiveDate) {
        for row in self.rows.values_mut() {
            row.reclassify(today);
        }
    }
}
