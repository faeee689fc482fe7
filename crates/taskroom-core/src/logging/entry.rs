//! One line of a session log.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tracing event as written to `<date>_<user>.jsonl`
///
/// The `room` field of an event is lifted to the top level so a log can be
/// filtered per room without digging into `fields`:
///
/// ```bash
/// jq 'select(.room == "work")' logs/*.jsonl
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLogEntry {
    /// RFC 3339, millisecond precision, UTC
    pub ts: String,
    pub level: String,
    /// User the client runs as
    pub user: String,
    pub target: String,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,
    /// Enclosing span names, outermost first, joined with " > "
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<String>,
}

impl SessionLogEntry {
    pub fn new(
        level: impl Into<String>,
        user: impl Into<String>,
        target: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self {
            ts: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            level: level.into(),
            user: user.into(),
            target: target.into(),
            msg: msg.into(),
            room: None,
            fields: None,
            span: None,
        }
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Attach structured fields; an empty object is left out
    pub fn with_fields(mut self, fields: serde_json::Map<String, Value>) -> Self {
        if !fields.is_empty() {
            self.fields = Some(Value::Object(fields));
        }
        self
    }

    pub fn with_span(mut self, span: impl Into<String>) -> Self {
        self.span = Some(span.into());
        self
    }

    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn parse_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_line_shape() {
        let mut fields = serde_json::Map::new();
        fields.insert("count".to_string(), 2.into());
        let entry = SessionLogEntry::new("info", "ada", "taskroom_core::view", "Applying room snapshot")
            .with_room("work")
            .with_fields(fields);

        let line = entry.to_line().unwrap();
        assert!(line.contains("\"user\":\"ada\""));
        assert!(line.contains("\"room\":\"work\""));
        assert!(line.contains("\"count\":2"));
        assert!(!line.contains("\"span\""));

        assert_eq!(SessionLogEntry::parse_line(&line).unwrap(), entry);
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let entry = SessionLogEntry::new("debug", "ada", "taskroom", "tick")
            .with_fields(serde_json::Map::new());
        assert!(entry.fields.is_none());
        assert!(!entry.to_line().unwrap().contains("fields"));
    }
}
