//! Generative-text backend abstraction.
//!
//! The pipeline only needs "send a prompt, get text back". Vendor specifics
//! (auth style, envelope shape, structured-output knobs) stay behind this
//! trait so the extractor is identical for every vendor.

use async_trait::async_trait;

use crate::error::Result;

/// One generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,

    pub temperature: f32,

    pub max_output_tokens: u32,

    /// Ask the vendor to constrain output to JSON when it can.
    pub json_output: bool,

    /// Strict JSON schema for vendors that accept one.
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: 0.7,
            max_output_tokens: 2048,
            json_output: false,
            response_schema: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = max;
        self
    }

    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }

    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.json_output = true;
        self.response_schema = Some(schema);
        self
    }
}

/// A vendor that turns a prompt into text.
///
/// Implementations return the candidate text verbatim; parsing it is the
/// extractor's job.
#[async_trait]
pub trait GenerativeTextBackend: Send + Sync {
    /// Short vendor name for logs and results (e.g. "gemini").
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
