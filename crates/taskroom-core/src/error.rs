//! Error types for Taskroom

use thiserror::Error;

/// Main error type for Taskroom operations
///
/// Invalid user input and stale server events are not errors: the view
/// silently ignores them. This type covers the plumbing around the view.
#[derive(Error, Debug)]
pub enum RoomError {
    /// Error during serialization/deserialization of a wire frame
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Connection to the room server failed or broke
    #[error("Transport error: {0}")]
    Transport(String),

    /// A line of user input could not be understood
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using RoomError
pub type RoomResult<T> = Result<T, RoomError>;

impl From<serde_json::Error> for RoomError {
    fn from(err: serde_json::Error) -> Self {
        RoomError::Serialization(err.to_string())
    }
}
