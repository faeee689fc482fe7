//! Plain-text rendering of a view snapshot

use std::fmt::Write;

use taskroom_core::session::ViewSnapshot;
use taskroom_core::{RenderedRow, ToastPhase};

/// Render a snapshot as a block of terminal text
pub fn render(snap: &ViewSnapshot) -> String {
    let mut out = String::new();

    match &snap.room {
        Some(room) => {
            let _ = writeln!(out, "── Room: {} ({}) ──", room, snap.username);
        }
        None => {
            let _ = writeln!(out, "── No room joined ({}) ── type 'join <room>'", snap.username);
        }
    }

    if snap.room.is_some() && snap.rows.is_empty() {
        out.push_str("  (no tasks)\n");
    }

    for row in &snap.rows {
        render_row(&mut out, row, snap);
    }

    if let Some(typing) = &snap.typing {
        let _ = writeln!(out, "  {}", typing);
    }

    for (text, phase) in &snap.toasts {
        match phase {
            ToastPhase::Visible => {
                let _ = writeln!(out, "  » {}", text);
            }
            ToastPhase::Fading => {
                let _ = writeln!(out, "  · {}", text);
            }
        }
    }

    if let Some(edit) = &snap.editing {
        let _ = writeln!(
            out,
            "  editing {}: 'save <text> [@YYYY-MM-DD]' or 'cancel'",
            edit.id
        );
    }

    out
}

fn render_row(out: &mut String, row: &RenderedRow, snap: &ViewSnapshot) {
    let check = if row.is_done() { "[x]" } else { "[ ]" };
    let editing = snap
        .editing
        .as_ref()
        .map(|edit| &edit.id == row.id())
        .unwrap_or(false);

    let _ = writeln!(
        out,
        "{} {} {:>4}  {}{}",
        row.status().marker(),
        check,
        row.id(),
        row.text(),
        if editing { "  (editing)" } else { "" }
    );

    if let Some(due) = row.due_line() {
        let _ = writeln!(out, "            {} ({})", due, row.status());
    }
    let _ = writeln!(out, "            {}", row.attribution());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use taskroom_core::{PendingEdit, RoomName, Task, TaskId};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn snapshot(rows: Vec<RenderedRow>) -> ViewSnapshot {
        ViewSnapshot {
            revision: 1,
            username: "ada".to_string(),
            room: Some(RoomName::new("work")),
            controls_enabled: true,
            rows,
            typing: None,
            toasts: Vec::new(),
            editing: None,
            today: today(),
        }
    }

    #[test]
    fn test_render_rows() {
        let overdue = Task::new(1, "File taxes", "ada")
            .with_due(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let mut done = Task::new(2, "Water plants", "bob").with_editor("ada");
        done.done = true;

        let text = render(&snapshot(vec![
            RenderedRow::new(overdue, today()),
            RenderedRow::new(done, today()),
        ]));

        assert!(text.contains("Room: work (ada)"));
        assert!(text.contains("! [ ]    1  File taxes"));
        assert!(text.contains("Due: 2024-06-01 (overdue)"));
        assert!(text.contains("[x]    2  Water plants"));
        assert!(text.contains("Created by bob, last edited by ada"));
    }

    #[test]
    fn test_render_without_room() {
        let mut snap = snapshot(Vec::new());
        snap.room = None;
        snap.controls_enabled = false;

        let text = render(&snap);
        assert!(text.contains("No room joined"));
        assert!(!text.contains("(no tasks)"));
    }

    #[test]
    fn test_render_overlays() {
        let mut snap = snapshot(vec![RenderedRow::new(Task::new(7, "Draft", "ada"), today())]);
        snap.typing = Some("bob is typing...".to_string());
        snap.toasts = vec![
            ("bob: joined".to_string(), ToastPhase::Visible),
            ("Someone: left".to_string(), ToastPhase::Fading),
        ];
        snap.editing = Some(PendingEdit::new(TaskId::Num(7), "Draft", None));

        let text = render(&snap);
        assert!(text.contains("bob is typing..."));
        assert!(text.contains("» bob: joined"));
        assert!(text.contains("· Someone: left"));
        assert!(text.contains("Draft  (editing)"));
        assert!(text.contains("editing 7:"));
    }
}
