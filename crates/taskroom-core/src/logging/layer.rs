//! Tracing layer that writes events to a session JSONL file.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use super::entry::SessionLogEntry;
use super::writer::SessionLogWriter;

/// A tracing Layer that appends every event to a JSONL file
pub struct SessionLogLayer {
    writer: Arc<SessionLogWriter>,
}

impl SessionLogLayer {
    /// Open the layer's log file under `logs_dir`
    pub fn new(logs_dir: impl AsRef<Path>, user: impl Into<String>) -> io::Result<Self> {
        let writer = SessionLogWriter::new(logs_dir, user)?;
        Ok(Self {
            writer: Arc::new(writer),
        })
    }

    pub fn log_path(&self) -> &Path {
        self.writer.path()
    }
}

impl<S> Layer<S> for SessionLogLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = metadata.level().as_str().to_lowercase();

        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);
        let room = visitor.take_room();

        let mut entry = SessionLogEntry::new(
            level,
            self.writer.user(),
            metadata.target(),
            visitor.message.unwrap_or_default(),
        )
        .with_fields(visitor.fields);

        if let Some(room) = room {
            entry = entry.with_room(room);
        }

        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<&str> = scope.from_root().map(|span| span.name()).collect();
            if !spans.is_empty() {
                entry = entry.with_span(spans.join(" > "));
            }
        }

        // Write errors are dropped
        let _ = self.writer.write(&entry);
    }
}

/// Collects the message and structured fields of one event
#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: serde_json::Map<String, serde_json::Value>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: serde_json::Value) {
        self.fields.insert(field.name().to_string(), value);
    }

    /// Remove a string `room` field, if the event carried one
    fn take_room(&mut self) -> Option<String> {
        match self.fields.get("room") {
            Some(serde_json::Value::String(_)) => match self.fields.remove("room") {
                Some(serde_json::Value::String(room)) => Some(room),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let text = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(text);
        } else {
            self.insert(field, serde_json::Value::String(text));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.into());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, serde_json::Value::String(value.to_string()));
    }
}

/// Builder installing the global subscriber for a client session
pub struct LoggingBuilder {
    logs_dir: PathBuf,
    user: String,
    env_filter: Option<String>,
}

impl LoggingBuilder {
    pub fn new(logs_dir: impl Into<PathBuf>, user: impl Into<String>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            user: user.into(),
            env_filter: None,
        }
    }

    /// Filter directives (e.g. "taskroom=info,taskroom_core=debug").
    /// `RUST_LOG` takes precedence when set.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Build the JSONL layer without installing it
    pub fn build_layer(&self) -> io::Result<SessionLogLayer> {
        SessionLogLayer::new(&self.logs_dir, self.user.clone())
    }

    /// Install the global subscriber; returns the log file path
    pub fn init(self) -> io::Result<PathBuf> {
        let layer = self.build_layer()?;
        let path = layer.log_path().to_path_buf();

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(self.env_filter.as_deref().unwrap_or("info"))
        });

        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        Ok(path)
    }
}
