//! Error types for the design logger
//!
//! Most session errors are soft: the component swallows them and leaves
//! its output unchanged. Only export failures reach the host.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the design logger
#[derive(Error, Debug)]
pub enum LoggerError {
    /// Session length was zero, negative or not a number
    #[error("Invalid session length: {minutes} minutes (must be > 0)")]
    InvalidDuration { minutes: f64 },

    /// User cancelled the start confirmation
    #[error("Session start declined by user")]
    StartDeclined,

    /// Writing a CSV or event log failed
    #[error("Export to {} failed: {source}", .path.display())]
    ExportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Recording or export attempted before the session started
    #[error("No session has been started")]
    UninitializedSession,

    /// Session state machine transition errors
    #[error("Invalid session transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    /// Generic errors with context, e.g. an unparseable CSV field
    #[error("Logger error: {0}")]
    Generic(String),
}

impl LoggerError {
    /// Errors the host never sees; the invocation is simply a no-op
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidDuration { .. }
                | LoggerError::StartDeclined
                | LoggerError::UninitializedSession
        )
    }
}

/// Result type alias for logger operations
pub type Result<T> = std::result::Result<T, LoggerError>;
