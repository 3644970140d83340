//! OpenAI backend (secondary vendor).

use async_trait::async_trait;
use llm_client::{ChatRequest, Message, OpenAIClient};
use tracing::debug;

use crate::error::Result;
use crate::traits::backend::{GenerationRequest, GenerativeTextBackend};

const SCHEMA_NAME: &str = "fact_check_report";

/// `GenerativeTextBackend` over OpenAI chat completions.
#[derive(Clone)]
pub struct OpenAIBackend {
    client: OpenAIClient,
    model: String,
}

impl OpenAIBackend {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_request(&self, request: &GenerationRequest) -> ChatRequest {
        let chat = ChatRequest::new(&self.model)
            .message(Message::user(&request.prompt))
            .temperature(request.temperature)
            .max_tokens(request.max_output_tokens);

        match (&request.response_schema, request.json_output) {
            (Some(schema), _) => chat.json_schema(SCHEMA_NAME, schema.clone()),
            (None, true) => chat.json_object(),
            (None, false) => chat,
        }
    }
}

#[async_trait]
impl GenerativeTextBackend for OpenAIBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        debug!(model = %self.model, prompt_chars = request.prompt.len(), "OpenAI generate");
        let response = self.client.chat_completion(self.chat_request(request)).await?;
        Ok(response.content)
    }
}
