//! Due-date classification and snapshot ordering

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

use crate::types::Task;

/// Visual classification of a row by its due date
///
/// Compared at day granularity against "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DueStatus {
    /// Due date is before today
    Overdue,
    /// Due date is today
    DueToday,
    /// Due date is after today
    Upcoming,
    /// Task has no due date
    NoDueDate,
}

impl DueStatus {
    /// Classify a due date against today
    pub fn classify(due_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        match due_date.map(|due| due.cmp(&today)) {
            None => DueStatus::NoDueDate,
            Some(Ordering::Less) => DueStatus::Overdue,
            Some(Ordering::Equal) => DueStatus::DueToday,
            Some(Ordering::Greater) => DueStatus::Upcoming,
        }
    }

    /// Single-character marker used by text renderers
    pub fn marker(&self) -> char {
        match self {
            DueStatus::Overdue => '!',
            DueStatus::DueToday => '*',
            DueStatus::Upcoming => '>',
            DueStatus::NoDueDate => ' ',
        }
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueStatus::Overdue => write!(f, "overdue"),
            DueStatus::DueToday => write!(f, "due-today"),
            DueStatus::Upcoming => write!(f, "upcoming"),
            DueStatus::NoDueDate => write!(f, "none"),
        }
    }
}

/// Order a snapshot for display
///
/// Dated tasks come first, earliest due date first. Undated tasks follow in
/// arrival order. The sort is stable, so equal dates also keep arrival order.
pub fn sort_snapshot(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| (task.due_date.is_none(), task.due_date));
}
