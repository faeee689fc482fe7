//! Wire protocol between a Taskroom client and its room server
//!
//! Every frame is a JSON object naming the event and carrying its payload:
//!
//! ```text
//! {"event": "add_task", "data": {"room": "work", "username": "ada", "text": "Ship it", "due_date": null}}
//! ```
//!
//! ## Message Flow
//!
//! ```text
//! Client                              Server
//!   |                                   |
//!   |--- join_room {room} ------------->|
//!   |<-- room_data {tasks} -------------|   (snapshot, to the joiner only)
//!   |<-- notification {message} --------|   (to the whole room)
//!   |                                   |
//!   |--- add_task {text, due_date} ---->|
//!   |<-- task_added {task} -------------|   (echoed to the whole room)
//!   |                                   |
//!   |--- typing ----------------------->|
//!   |          (others receive user_typing / user_stop_typing)
//! ```
//!
//! Delivery order and reliability belong to the transport. The client applies
//! whatever arrives, last event wins per task id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RoomResult;
use crate::types::{RoomName, Task, TaskId};

/// Requests sent from the client to the room server
///
/// Every request carries the room it targets and the acting username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientRequest {
    /// Subscribe to a room and ask for its snapshot
    JoinRoom {
        room: RoomName,
        username: String,
    },

    /// Create a task
    AddTask {
        room: RoomName,
        username: String,
        text: String,
        due_date: Option<NaiveDate>,
    },

    /// Delete a task
    RemoveTask {
        room: RoomName,
        username: String,
        id: TaskId,
    },

    /// Flip a task's completion state
    ToggleDone {
        room: RoomName,
        username: String,
        id: TaskId,
    },

    /// Replace a task's text and due date
    EditTask {
        room: RoomName,
        username: String,
        id: TaskId,
        text: String,
        due_date: Option<NaiveDate>,
    },

    /// The user is typing in the task entry fields
    Typing {
        room: RoomName,
        username: String,
    },

    /// The user stopped typing
    StopTyping {
        room: RoomName,
        username: String,
    },
}

impl ClientRequest {
    /// Encode to a single JSON line (no trailing newline)
    pub fn encode(&self) -> RoomResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from a JSON line
    pub fn decode(line: &str) -> RoomResult<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Wire name of the request
    pub fn name(&self) -> &'static str {
        match self {
            ClientRequest::JoinRoom { .. } => "join_room",
            ClientRequest::AddTask { .. } => "add_task",
            ClientRequest::RemoveTask { .. } => "remove_task",
            ClientRequest::ToggleDone { .. } => "toggle_done",
            ClientRequest::EditTask { .. } => "edit_task",
            ClientRequest::Typing { .. } => "typing",
            ClientRequest::StopTyping { .. } => "stop_typing",
        }
    }

    /// Room the request targets
    pub fn room(&self) -> &RoomName {
        match self {
            ClientRequest::JoinRoom { room, .. }
            | ClientRequest::AddTask { room, .. }
            | ClientRequest::RemoveTask { room, .. }
            | ClientRequest::ToggleDone { room, .. }
            | ClientRequest::EditTask { room, .. }
            | ClientRequest::Typing { room, .. }
            | ClientRequest::StopTyping { room, .. } => room,
        }
    }
}

/// Events pushed from the room server to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Full task list of the joined room
    RoomData { tasks: Vec<Task> },

    /// A task was created
    TaskAdded(Task),

    /// A task was deleted
    TaskRemoved { id: TaskId },

    /// A task's completion state changed
    TaskToggled { id: TaskId, done: bool },

    /// A task's text and due date changed
    TaskEdited {
        id: TaskId,
        text: String,
        #[serde(default)]
        due_date: Option<NaiveDate>,
    },

    /// Human-readable activity message
    Notification {
        message: String,
        #[serde(default)]
        username: Option<String>,
    },

    /// Another member is typing
    UserTyping { username: String },

    /// The typing member went quiet
    UserStopTyping {},
}

impl ServerEvent {
    /// Encode to a single JSON line (no trailing newline)
    pub fn encode(&self) -> RoomResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from a JSON line
    pub fn decode(line: &str) -> RoomResult<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::RoomData { .. } => "room_data",
            ServerEvent::TaskAdded(_) => "task_added",
            ServerEvent::TaskRemoved { .. } => "task_removed",
            ServerEvent::TaskToggled { .. } => "task_toggled",
            ServerEvent::TaskEdited { .. } => "task_edited",
            ServerEvent::Notification { .. } => "notification",
            ServerEvent::UserTyping { .. } => "user_typing",
            ServerEvent::UserStopTyping {} => "user_stop_typing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_add_task_wire_shape() {
        let req = ClientRequest::AddTask {
            room: RoomName::new("work"),
            username: "ada".to_string(),
            text: "Ship it".to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 5, 1),
        };

        let value: Value = serde_json::from_str(&req.encode().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "add_task",
                "data": {
                    "room": "work",
                    "username": "ada",
                    "text": "Ship it",
                    "due_date": "2024-05-01"
                }
            })
        );
    }

    #[test]
    fn test_request_names_match_wire() {
        let req = ClientRequest::ToggleDone {
            room: RoomName::new("work"),
            username: "ada".to_string(),
            id: TaskId::Num(2),
        };
        let value: Value = serde_json::from_str(&req.encode().unwrap()).unwrap();
        assert_eq!(value["event"], req.name());
        assert_eq!(req.room().as_str(), "work");
    }

    #[test]
    fn test_decode_room_data() {
        let line = r#"{"event":"room_data","data":{"tasks":[
            {"id":1,"text":"a","done":false,"due_date":null,"created_by":"ada","last_modified_by":"ada"},
            {"id":2,"text":"b","done":true,"due_date":"2024-01-01","created_by":"ada","last_modified_by":"bob"}
        ]}}"#;

        match ServerEvent::decode(line).unwrap() {
            ServerEvent::RoomData { tasks } => {
                assert_eq!(tasks.len(), 2);
                assert_eq!(tasks[1].due_date, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(tasks[1].last_modified_by.as_deref(), Some("bob"));
            }
            other => panic!("Wrong event type: {:?}", other),
        }
    }

    #[test]
    fn test_decode_task_added_is_bare_task() {
        let line = r#"{"event":"task_added","data":{"id":"k1","text":"x","created_by":"ada"}}"#;
        let event = ServerEvent::decode(line).unwrap();
        assert!(matches!(event, ServerEvent::TaskAdded(ref t) if t.id == TaskId::Key("k1".into())));
    }

    #[test]
    fn test_decode_task_edited_without_due() {
        let line = r#"{"event":"task_edited","data":{"id":3,"text":"new"}}"#;
        assert_eq!(
            ServerEvent::decode(line).unwrap(),
            ServerEvent::TaskEdited {
                id: TaskId::Num(3),
                text: "new".to_string(),
                due_date: None,
            }
        );
    }

    #[test]
    fn test_decode_notification_null_username() {
        let line = r#"{"event":"notification","data":{"message":"hi","username":null}}"#;
        assert_eq!(
            ServerEvent::decode(line).unwrap(),
            ServerEvent::Notification {
                message: "hi".to_string(),
                username: None,
            }
        );
    }

    #[test]
    fn test_decode_stop_typing_empty_payload() {
        let event = ServerEvent::decode(r#"{"event":"user_stop_typing","data":{}}"#).unwrap();
        assert_eq!(event, ServerEvent::UserStopTyping {});
        assert_eq!(event.name(), "user_stop_typing");
    }

    #[test]
    fn test_decode_unknown_event_fails() {
        assert!(ServerEvent::decode(r#"{"event":"task_exploded","data":{}}"#).is_err());
        assert!(ServerEvent::decode("not json").is_err());
    }
}
