//! HTTP client for the local agent service.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FactCheckError, Result};
use crate::traits::agent::{TranscriptSource, VerificationAgent};
use crate::types::{config::FactCheckConfig, transcript::TranscriptSegment};

#[derive(Serialize)]
struct VerifyRequest<'a> {
    claim: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponse {
    result: String,
}

#[derive(Serialize)]
struct TranscriptRequest<'a> {
    video_id: &'a str,
}

#[derive(Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    transcript: Vec<TranscriptSegment>,
}

/// FastAPI-style `{"detail": "..."}` error body.
#[derive(Deserialize)]
struct ErrorDetail {
    detail: String,
}

/// Client for `POST /verify` and `POST /transcript`.
#[derive(Clone)]
pub struct AgentClient {
    client: Client,
    base_url: String,
}

impl AgentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build from config, applying the request timeout.
    pub fn from_config(config: &FactCheckConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| FactCheckError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::new(&config.agent_url).with_http_client(client))
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map a failed send: a refused connection means the service is not
    /// running, anything else (timeouts included) becomes `otherwise`.
    fn send_error(
        &self,
        endpoint: &str,
        err: reqwest::Error,
        otherwise: fn(String) -> FactCheckError,
    ) -> FactCheckError {
        warn!(endpoint, error = %err, "Agent request failed");
        if err.is_connect() {
            FactCheckError::ServiceUnavailable {
                url: self.base_url.clone(),
            }
        } else {
            otherwise(err.to_string())
        }
    }
}

#[async_trait]
impl VerificationAgent for AgentClient {
    async fn verify(&self, claim: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/verify", self.base_url))
            .json(&VerifyRequest { claim })
            .send()
            .await
            .map_err(|e| self.send_error("/verify", e, FactCheckError::Agent))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FactCheckError::Agent(format!("Server error: {}", status.as_u16())));
        }

        let body: VerifyResponse = response
            .json()
            .await
            .map_err(|e| FactCheckError::Agent(format!("invalid /verify response: {}", e)))?;
        Ok(body.result)
    }
}

#[async_trait]
impl TranscriptSource for AgentClient {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptSegment>> {
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(format!("{}/transcript", self.base_url))
            .json(&TranscriptRequest { video_id })
            .send()
            .await
            .map_err(|e| self.send_error("/transcript", e, FactCheckError::Transcript))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorDetail>(&body)
                .map(|d| d.detail)
                .unwrap_or_else(|_| format!("Server error: {}", status.as_u16()));
            warn!(status = %status, detail = %detail, "Transcript service error");
            return Err(FactCheckError::Transcript(detail));
        }

        let body: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| FactCheckError::Transcript(format!("invalid /transcript response: {}", e)))?;

        debug!(
            video_id = %video_id,
            segments = body.transcript.len(),
            duration_ms = start.elapsed().as_millis(),
            "Fetched transcript"
        );
        Ok(body.transcript)
    }
}
