//! Property-based tests for the room view
//!
//! Uses proptest to check the row invariants under arbitrary event streams.

use std::collections::HashSet;

use chrono::NaiveDate;
use proptest::prelude::*;
use taskroom_core::{DueChange, DueStatus, RoomView, ServerEvent, Task, TaskId, ViewConfig};
use tokio::sync::mpsc;
use tokio::time::Instant;

// ============================================================================
// Strategy Generators
// ============================================================================

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

/// Dates within a couple of months either side of "today"
fn due_strategy() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of((-60i64..60).prop_map(|offset| today() + chrono::Duration::days(offset)))
}

fn task_strategy() -> impl Strategy<Value = Task> {
    (0i64..20, "[a-z ]{1,16}", any::<bool>(), due_strategy()).prop_map(|(id, text, done, due)| {
        let mut task = Task::new(id, text, "ada");
        task.done = done;
        task.due_date = due;
        task
    })
}

/// Server events touching a small id space so collisions are common
fn event_strategy() -> impl Strategy<Value = ServerEvent> {
    prop_oneof![
        1 => prop::collection::vec(task_strategy(), 0..10)
            .prop_map(|tasks| ServerEvent::RoomData { tasks }),
        3 => task_strategy().prop_map(ServerEvent::TaskAdded),
        2 => (0i64..20).prop_map(|id| ServerEvent::TaskRemoved { id: TaskId::Num(id) }),
        2 => (0i64..20, any::<bool>())
            .prop_map(|(id, done)| ServerEvent::TaskToggled { id: TaskId::Num(id), done }),
        2 => (0i64..20, "[a-z]{1,8}", due_strategy()).prop_map(|(id, text, due_date)| {
            ServerEvent::TaskEdited { id: TaskId::Num(id), text, due_date }
        }),
    ]
}

fn joined_view() -> RoomView {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut view = RoomView::with_today(ViewConfig::new("ada", ["A"]), tx, today());
    view.join_room("A");
    view
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Every id is rendered at most once, whatever the event order
    #[test]
    fn rows_are_unique_per_id(events in prop::collection::vec(event_strategy(), 0..60)) {
        let mut view = joined_view();
        for event in events {
            view.on_event(event, Instant::now());
        }

        let ids = view.rows().ids();
        let unique: HashSet<_> = ids.iter().cloned().collect();
        prop_assert_eq!(unique.len(), ids.len());
        prop_assert_eq!(view.rows().iter().count(), ids.len());
    }

    /// After a snapshot, only snapshot ids are rendered, dated rows first and ascending
    #[test]
    fn snapshot_order_and_membership(tasks in prop::collection::vec(task_strategy(), 0..15)) {
        let mut view = joined_view();
        view.on_event(ServerEvent::TaskAdded(Task::new(999, "stale", "bob")), Instant::now());
        view.on_event(ServerEvent::RoomData { tasks: tasks.clone() }, Instant::now());

        let expected: HashSet<TaskId> = tasks.iter().map(|t| t.id.clone()).collect();
        let rendered: HashSet<TaskId> = view.rows().ids().into_iter().collect();
        prop_assert_eq!(rendered, expected);

        let dues: Vec<Option<NaiveDate>> = view.rows().iter().map(|r| r.due_date()).collect();
        let first_undated = dues.iter().position(|d| d.is_none()).unwrap_or(dues.len());
        prop_assert!(dues[first_undated..].iter().all(|d| d.is_none()));
        prop_assert!(dues[..first_undated].windows(2).all(|w| w[0] <= w[1]));
    }

    /// Classification always matches a fresh comparison with today
    #[test]
    fn classification_tracks_due_date(events in prop::collection::vec(event_strategy(), 0..40)) {
        let mut view = joined_view();
        for event in events {
            view.on_event(event, Instant::now());
        }

        for row in view.rows().iter() {
            let expected = DueStatus::classify(row.due_date(), today());
            prop_assert_eq!(row.status(), expected);
            prop_assert_eq!(row.status() == DueStatus::NoDueDate, row.due_date().is_none());
        }
    }

    /// Whitespace-only text never produces a request
    #[test]
    fn blank_text_never_sent(blank in "[ \t\n]{0,8}") {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut view = RoomView::with_today(ViewConfig::new("ada", ["A"]), tx, today());
        view.join_room("A");
        while rx.try_recv().is_ok() {}

        view.on_event(ServerEvent::TaskAdded(Task::new(1, "a", "ada")), Instant::now());
        view.begin_edit(&TaskId::Num(1));

        prop_assert!(view.submit_task(&blank, None).is_none());
        prop_assert!(view.confirm_edit(&blank, DueChange::Keep).is_none());
        prop_assert!(rx.try_recv().is_err());
        prop_assert_eq!(view.rows().len(), 1);
    }
}
