//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{FactCheckError, Result};
use crate::types::history::HISTORY_CAPACITY;

/// Configuration for the fact-check pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FactCheckConfig {
    /// Base URL of the local agent service (`/verify`, `/transcript`).
    ///
    /// Default: `http://127.0.0.1:8000`.
    pub agent_url: String,

    /// Input budget in characters; longer text is cut at a word boundary.
    ///
    /// Default: 30,000.
    pub max_input_chars: usize,

    /// Entries kept by the history store. Default: 50.
    pub history_capacity: usize,

    /// Gemini model id. Default: `gemini-1.5-flash`.
    pub gemini_model: String,

    /// OpenAI model id. Default: `gpt-4o`.
    pub openai_model: String,

    pub temperature: f32,

    pub max_output_tokens: u32,

    /// Per-request timeout for backend and agent calls.
    pub request_timeout_secs: u64,
}

impl Default for FactCheckConfig {
    fn default() -> Self {
        Self {
            agent_url: "http://127.0.0.1:8000".to_string(),
            max_input_chars: 30_000,
            history_capacity: HISTORY_CAPACITY,
            gemini_model: "gemini-1.5-flash".to_string(),
            openai_model: "gpt-4o".to_string(),
            temperature: 0.7,
            max_output_tokens: 2048,
            request_timeout_secs: 60,
        }
    }
}

impl FactCheckConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables, loading `.env` first if present.
    ///
    /// Unset variables keep their defaults; malformed numbers are errors.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();

        if let Ok(url) = std::env::var("FACT_CHECK_AGENT_URL") {
            config.agent_url = url;
        }
        if let Some(n) = parse_env("FACT_CHECK_MAX_INPUT_CHARS")? {
            config.max_input_chars = n;
        }
        if let Some(n) = parse_env("FACT_CHECK_HISTORY_CAPACITY")? {
            config.history_capacity = n;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.gemini_model = model;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.openai_model = model;
        }
        if let Some(secs) = parse_env("FACT_CHECK_TIMEOUT_SECS")? {
            config.request_timeout_secs = secs;
        }

        Ok(config)
    }

    pub fn with_agent_url(mut self, url: impl Into<String>) -> Self {
        self.agent_url = url.into();
        self
    }

    pub fn with_max_input_chars(mut self, max: usize) -> Self {
        self.max_input_chars = max;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| FactCheckError::Config(format!("{} must be a number, got {:?}", key, raw))),
        Err(_) => Ok(None),
    }
}
