//! JSONL logging for terminal sessions
//!
//! Standard output belongs to the rendered room view, so diagnostics go to a
//! per-user JSONL file instead:
//!
//! ```text
//! <log-dir>/
//! ├── 2026-01-21_ada.jsonl
//! └── 2026-01-21_grace.jsonl
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use taskroom_core::logging::LoggingBuilder;
//!
//! let log_path = LoggingBuilder::new("./logs", "ada")
//!     .with_filter("taskroom=debug")
//!     .init()?;
//! ```
//!
//! Query with jq:
//!
//! ```bash
//! jq 'select(.level == "warn")' logs/*.jsonl
//! ```

pub mod entry;
pub mod layer;
pub mod writer;

pub use entry::SessionLogEntry;
pub use layer::{LoggingBuilder, SessionLogLayer};
pub use writer::{read_entries, SessionLogWriter};
