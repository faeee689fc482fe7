//! Taskroom Core Library
//!
//! Client-side synchronization of a shared, server-authoritative task list.
//!
//! ## Overview
//!
//! Users join named "rooms" (shared task lists). Every participant sends
//! intents (add, remove, toggle, edit) to a room server, and the server pushes
//! the resulting changes back to everyone in the room. This crate owns the
//! client half of that loop: it turns intents into outbound requests and
//! reconciles pushed events into an ordered, display-ready list of rows.
//!
//! ## Core Principles
//!
//! - **Server-authoritative**: rows only change when the server says so
//! - **One room at a time**: switching rooms discards all render state
//! - **Cooperative**: every mutation happens on one task, no locks
//!
//! ## Quick Start
//!
//! ```ignore
//! use taskroom_core::{RoomView, ViewConfig, ServerEvent};
//! use tokio::sync::mpsc;
//!
//! let (tx, mut outbound) = mpsc::unbounded_channel();
//! let mut view = RoomView::new(ViewConfig::new("ada", ["work"]), tx);
//!
//! view.join_room("work");
//! assert!(outbound.try_recv().is_ok()); // join_room request
//!
//! let event = ServerEvent::decode(r#"{"event":"room_data","data":{"tasks":[]}}"#)?;
//! view.on_event(event, tokio::time::Instant::now());
//! ```

pub mod config;
pub mod due;
pub mod error;
pub mod form;
pub mod logging;
pub mod protocol;
pub mod rows;
pub mod session;
pub mod toast;
pub mod types;
pub mod typing;
pub mod view;

// Re-exports
pub use config::ViewConfig;
pub use due::DueStatus;
pub use error::{RoomError, RoomResult};
pub use form::{DueChange, EntryForm, PendingEdit};
pub use protocol::{ClientRequest, ServerEvent};
pub use rows::{RenderedRow, RowList};
pub use session::{Intent, ViewSnapshot};
pub use toast::{Toast, ToastPhase, ToastStack};
pub use types::*;
pub use typing::{TypingDebounce, TypingIndicator};
pub use view::RoomView;
