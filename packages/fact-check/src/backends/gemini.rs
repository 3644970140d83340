//! Gemini backend (primary vendor).

use async_trait::async_trait;
use llm_client::{GeminiClient, GenerateContentRequest};
use tracing::debug;

use crate::error::Result;
use crate::traits::backend::{GenerationRequest, GenerativeTextBackend};

/// `GenerativeTextBackend` over the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiBackend {
    client: GeminiClient,
    model: String,
}

impl GeminiBackend {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerativeTextBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        // Gemini has no strict-schema mode on this endpoint; JSON mime type is the closest knob
        let mut body = GenerateContentRequest::from_prompt(&request.prompt)
            .temperature(request.temperature)
            .max_output_tokens(request.max_output_tokens);
        if request.json_output {
            body = body.json_output();
        }

        debug!(model = %self.model, prompt_chars = request.prompt.len(), "Gemini generate");
        Ok(self.client.generate_text(&self.model, &body).await?)
    }
}
