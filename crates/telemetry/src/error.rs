//! Error types for the action log.

use thiserror::Error;

/// Errors that can occur while recording or sending action log entries.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to serialize or parse a log entry
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to deliver a log entry
    #[error("Transport error: {0}")]
    Transport(String),

    /// Entry rejected by validation
    #[error("Invalid log entry: {0}")]
    InvalidEntry(String),

    /// Queue is full
    #[error("Log queue is full")]
    QueueFull,
}

/// Result type for action log operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
