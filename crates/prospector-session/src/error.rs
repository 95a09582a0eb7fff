//! Error types for session persistence.

use thiserror::Error;

/// Errors that can occur while loading or persisting session state.
#[derive(Error, Debug)]
pub enum SessionError {
    /// I/O error reading or writing the session file
    #[error("session file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Session file contents could not be (de)serialized
    #[error("session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
