//! HTTP implementation of [`Analyzer`].

use crate::client::{AnalysisError, Analyzer};
use crate::core::session::AnalysisResult;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Request body sent to the analysis endpoint.
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// Body returned by the service root.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Analysis client backed by a JSON-over-HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpAnalyzer {
    client: Client,
    endpoint: Url,
}

impl HttpAnalyzer {
    /// Create a client for `endpoint`.
    ///
    /// Without a timeout, requests wait as long as the service takes.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| Error::Config(format!("invalid endpoint {endpoint}: {e}")))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, endpoint })
    }

    /// The configured analysis endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Ask the service root for its status line.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalysisError`] if the service is unreachable or answers
    /// with something other than a status object.
    pub async fn health(&self) -> std::result::Result<String, AnalysisError> {
        let root = self
            .endpoint
            .join("/")
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        let response = self.client.get(root).send().await.map_err(map_reqwest)?;
        let body = checked_body(response).await?;

        let health: HealthResponse =
            serde_json::from_str(&body).map_err(|e| AnalysisError::Decode(e.to_string()))?;
        Ok(health.status)
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze(&self, text: &str) -> std::result::Result<AnalysisResult, AnalysisError> {
        debug!(endpoint = %self.endpoint, chars = text.chars().count(), "sending analysis request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&AnalyzeRequest { text })
            .send()
            .await
            .map_err(map_reqwest)?;

        let body = checked_body(response).await?;

        let result: AnalysisResult =
            serde_json::from_str(&body).map_err(|e| AnalysisError::Decode(e.to_string()))?;

        if !result.has_valid_confidence() {
            return Err(AnalysisError::Decode(format!(
                "confidence {} outside [0, 1]",
                result.confidence
            )));
        }

        debug!(sentiment = %result.sentiment, confidence = result.confidence, "analysis complete");
        Ok(result)
    }
}

/// Read the body of a successful response, or turn the status into an error.
async fn checked_body(response: reqwest::Response) -> std::result::Result<String, AnalysisError> {
    let status = response.status();
    let body = response.text().await.map_err(map_reqwest)?;

    if !status.is_success() {
        warn!(status = status.as_u16(), "analysis service error");
        return Err(AnalysisError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

fn map_reqwest(err: reqwest::Error) -> AnalysisError {
    if err.is_timeout() {
        AnalysisError::Timeout
    } else if err.is_decode() {
        AnalysisError::Decode(err.to_string())
    } else {
        AnalysisError::Transport(err.to_string())
    }
}
