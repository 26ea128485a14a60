//! Error types for impactwatch.

use crate::client::AnalysisError;
use std::io;
use thiserror::Error;

/// Result type alias for impactwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in impactwatch operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage I/O error.
    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Session not found.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// No session is currently active.
    #[error("No active session")]
    NoActiveSession,

    /// Submitted text was empty or whitespace only.
    #[error("Nothing to analyze")]
    EmptyInput,

    /// A request is still outstanding; submission is disabled until it completes.
    #[error("An analysis request is already in flight")]
    RequestInFlight,

    /// The referenced message cannot be used for this action.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// The analysis service call failed.
    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Interactive terminal error.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl From<rustyline::error::ReadlineError> for Error {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        Self::Terminal(err.to_string())
    }
}
