//! Error types for rollcall.
//!
//! The display string of every variant is exactly what callers see in the
//! `error` field of a response envelope.

use thiserror::Error;

/// Errors that can occur while handling a request.
#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Unknown action")]
    UnknownAction,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Store(String),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Server error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AttendanceError {
    pub fn missing_fields() -> Self {
        AttendanceError::Validation("Missing required fields".into())
    }

    pub fn unauthorized() -> Self {
        AttendanceError::Unauthorized("Unauthorized: Invalid or expired token".into())
    }

    /// True for faults of the server itself rather than of the request.
    pub fn is_server_fault(&self) -> bool {
        matches!(
            self,
            AttendanceError::Config(_)
                | AttendanceError::Store(_)
                | AttendanceError::Io(_)
                | AttendanceError::Csv(_)
                | AttendanceError::Serialization(_)
        )
    }
}

/// Result type alias for rollcall operations.
pub type AttendanceResult<T> = Result<T, AttendanceError>;
