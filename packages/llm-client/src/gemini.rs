//! Google Gemini `generateContent` client.
//!
//! Gemini authenticates with a `key` query parameter rather than a bearer
//! header, so the key is attached per request and never logged.

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{LlmError, Result};
use crate::types::{self, GenerateContentRequest, GenerateContentResponse, ModelInfo};

const PROVIDER: &str = "Gemini";

/// Pure Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }

    /// Create from `GOOGLE_API_KEY`, falling back to `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .map_err(|_| LlmError::Config("GOOGLE_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate content and return the raw response envelope.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| {
                // reqwest includes the URL in its Display output; drop it so the key stays out of logs
                let e = e.without_url();
                warn!(error = %e, "Gemini request failed");
                LlmError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = types::error_message(&body);
            warn!(status = %status, error = %message, "Gemini API error");
            return Err(LlmError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.without_url().to_string()))?;

        debug!(
            model = %model,
            finish_reason = parsed.finish_reason().unwrap_or("unknown"),
            duration_ms = start.elapsed().as_millis(),
            "Gemini generateContent"
        );

        Ok(parsed)
    }

    /// Generate content and return the first candidate's text.
    pub async fn generate_text(&self, model: &str, request: &GenerateContentRequest) -> Result<String> {
        let response = self.generate_content(model, request).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyResponse { provider: PROVIDER })
    }

    /// List models available to this key.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .http_client
            .get(format!("{}/models", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| LlmError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                message: types::error_message(&body),
            });
        }

        let list: types::ModelList = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.without_url().to_string()))?;
        Ok(list.models)
    }
}
