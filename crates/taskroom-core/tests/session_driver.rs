//! Session driver integration tests
//!
//! Run `session::run` on a paused tokio clock so the typing debounce and
//! toast timers fire deterministically.

use std::time::Duration;

use taskroom_core::session::{self, Intent, ViewSnapshot};
use taskroom_core::{ClientRequest, RoomName, RoomView, ServerEvent, Task, TaskId, ViewConfig};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

// ============================================================================
// Test Utilities
// ============================================================================

struct Harness {
    intents: mpsc::Sender<Intent>,
    events: mpsc::Sender<ServerEvent>,
    outbound: mpsc::UnboundedReceiver<ClientRequest>,
    updates: watch::Receiver<ViewSnapshot>,
    driver: JoinHandle<RoomView>,
}

fn start_session() -> Harness {
    let (out_tx, outbound) = mpsc::unbounded_channel();
    let view = RoomView::new(ViewConfig::new("ada", ["work", "home"]), out_tx);
    let (updates_tx, updates) = watch::channel(view.snapshot(Instant::now()));

    let (intents, intents_rx) = mpsc::channel(16);
    let (events, events_rx) = mpsc::channel(16);
    let driver = tokio::spawn(session::run(view, intents_rx, events_rx, updates_tx));

    Harness {
        intents,
        events,
        outbound,
        updates,
        driver,
    }
}

/// Wait until the published snapshot satisfies `pred`
async fn wait_for(
    updates: &mut watch::Receiver<ViewSnapshot>,
    pred: impl Fn(&ViewSnapshot) -> bool,
) -> ViewSnapshot {
    loop {
        {
            let snap = updates.borrow_and_update();
            if pred(&snap) {
                return snap.clone();
            }
        }
        updates.changed().await.expect("driver stopped publishing");
    }
}

// ============================================================================
// Driver Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_stop_typing_fires_after_idle() {
    let mut h = start_session();

    h.intents.send(Intent::Join(RoomName::new("work"))).await.unwrap();
    assert!(matches!(
        h.outbound.recv().await,
        Some(ClientRequest::JoinRoom { .. })
    ));

    let typed_at = Instant::now();
    h.intents
        .send(Intent::Input {
            text: "Buy".to_string(),
            due_date: None,
        })
        .await
        .unwrap();
    assert!(matches!(h.outbound.recv().await, Some(ClientRequest::Typing { .. })));

    // The paused clock auto-advances to the debounce deadline
    let stop = h.outbound.recv().await.unwrap();
    assert_eq!(
        stop,
        ClientRequest::StopTyping {
            room: RoomName::new("work"),
            username: "ada".to_string(),
        }
    );
    assert!(typed_at.elapsed() >= Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn test_events_render_through_snapshot() {
    let mut h = start_session();

    h.intents.send(Intent::Join(RoomName::new("work"))).await.unwrap();
    h.events
        .send(ServerEvent::RoomData {
            tasks: vec![Task::new(1, "a", "ada"), Task::new(2, "b", "bob")],
        })
        .await
        .unwrap();
    h.events
        .send(ServerEvent::TaskToggled {
            id: TaskId::Num(2),
            done: true,
        })
        .await
        .unwrap();

    let snap = wait_for(&mut h.updates, |s| s.rows.iter().any(|r| r.is_done())).await;
    assert_eq!(snap.room, Some(RoomName::new("work")));
    assert_eq!(snap.ids(), vec![TaskId::Num(1), TaskId::Num(2)]);
    assert!(!snap.rows[0].is_done());
    assert!(snap.rows[1].is_done());
}

#[tokio::test(start_paused = true)]
async fn test_toast_expires_without_further_input() {
    let mut h = start_session();

    h.events
        .send(ServerEvent::Notification {
            message: "joined room 'work'".to_string(),
            username: Some("bob".to_string()),
        })
        .await
        .unwrap();

    let shown = wait_for(&mut h.updates, |s| !s.toasts.is_empty()).await;
    assert_eq!(shown.toasts[0].0, "bob: joined room 'work'");

    let shown_at = Instant::now();
    wait_for(&mut h.updates, |s| s.toasts.is_empty()).await;
    assert!(shown_at.elapsed() <= Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn test_driver_returns_view_when_inputs_close() {
    let h = start_session();
    h.intents.send(Intent::Join(RoomName::new("home"))).await.unwrap();

    drop(h.intents);
    drop(h.events);

    let view = h.driver.await.unwrap();
    assert_eq!(view.current_room(), Some(&RoomName::new("home")));
}
