//! Vendor backends behind [`GenerativeTextBackend`].
//!
//! [`LlmBackend`] is chosen once from [`Settings`] when a check starts;
//! nothing downstream branches on the vendor.

mod gemini;
mod openai;

pub use gemini::GeminiBackend;
pub use openai::OpenAIBackend;

use async_trait::async_trait;
use llm_client::{GeminiClient, OpenAIClient};
use tracing::info;

use crate::error::{FactCheckError, Result};
use crate::traits::backend::{GenerationRequest, GenerativeTextBackend};
use crate::types::{
    config::FactCheckConfig,
    settings::{BackendKind, Settings},
};

/// Shown when neither vendor has a key.
pub const NO_CREDENTIAL_MESSAGE: &str =
    "No API key configured. Please add an API key in the extension options.";

/// The configured generative-text vendor.
#[derive(Clone)]
pub enum LlmBackend {
    Gemini(GeminiBackend),
    OpenAi(OpenAIBackend),
}

impl LlmBackend {
    /// Select a backend from stored credentials.
    ///
    /// The preferred vendor wins only if it has a key; otherwise Gemini, then
    /// OpenAI. No key at all is a configuration error.
    pub fn from_settings(settings: &Settings, config: &FactCheckConfig) -> Result<Self> {
        let (kind, key) = settings
            .resolve_backend()
            .ok_or_else(|| FactCheckError::Config(NO_CREDENTIAL_MESSAGE.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| FactCheckError::Config(format!("failed to build HTTP client: {}", e)))?;

        let backend = match kind {
            BackendKind::Gemini => Self::Gemini(GeminiBackend::new(
                GeminiClient::new(key.expose()).with_http_client(http),
                &config.gemini_model,
            )),
            BackendKind::OpenAi => Self::OpenAi(OpenAIBackend::new(
                OpenAIClient::new(key.expose()).with_http_client(http),
                &config.openai_model,
            )),
        };

        info!(backend = %kind, preferred = %settings.preferred_model, "Selected generative backend");
        Ok(backend)
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Gemini(_) => BackendKind::Gemini,
            Self::OpenAi(_) => BackendKind::OpenAi,
        }
    }
}

#[async_trait]
impl GenerativeTextBackend for LlmBackend {
    fn name(&self) -> &str {
        match self {
            Self::Gemini(b) => b.name(),
            Self::OpenAi(b) => b.name(),
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        match self {
            Self::Gemini(b) => b.generate(request).await,
            Self::OpenAi(b) => b.generate(request).await,
        }
    }
}
