//! Error types for the LLM clients.

use thiserror::Error;

/// Result type for LLM client operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors shared by the OpenAI and Gemini clients.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from the vendor
    #[error("{provider} API error: {status} - {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// The vendor answered 2xx but returned no candidate text
    #[error("{provider} returned no content")]
    EmptyResponse { provider: &'static str },

    /// Parse error (invalid JSON, unexpected response envelope)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl LlmError {
    /// Whether the request never reached the vendor.
    pub fn is_network(&self) -> bool {
        matches!(self, LlmError::Network(_))
    }

    /// HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
