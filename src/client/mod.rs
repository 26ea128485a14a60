//! Client for the remote sentiment analysis service.

pub mod http;

use crate::core::session::AnalysisResult;
use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpAnalyzer;

/// Why an analysis request failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body was not a valid analysis result.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl AnalysisError {
    /// Short label for the failure kind, suitable for display.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "network",
            Self::Timeout => "timeout",
            Self::Status { .. } => "server",
            Self::Decode(_) => "response",
        }
    }
}

/// Something that can classify text.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Classify `text`.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalysisError`] describing why no result was produced.
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds() {
        assert_eq!(AnalysisError::Transport("refused".into()).kind(), "network");
        assert_eq!(AnalysisError::Timeout.kind(), "timeout");
        assert_eq!(
            AnalysisError::Status {
                status: 500,
                body: String::new()
            }
            .kind(),
            "server"
        );
        assert_eq!(AnalysisError::Decode("eof".into()).kind(), "response");
    }

    #[test]
    fn error_display_includes_status() {
        let err = AnalysisError::Status {
            status: 422,
            body: "bad text".to_string(),
        };
        assert_eq!(err.to_string(), "service returned 422: bad text");
    }
}
