//! Typed errors for the fact-check library.
//!
//! Only check-aborting conditions live here. Per-claim verification failures
//! and unparseable backend output are converted to data by the pipeline and
//! never surface as `FactCheckError`.

use thiserror::Error;

/// Errors that can abort a fact check.
#[derive(Debug, Error)]
pub enum FactCheckError {
    /// No usable credential or invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Generative-text backend failed (network, non-2xx, empty candidate)
    #[error("backend error: {0}")]
    Backend(#[from] llm_client::LlmError),

    /// The local agent service could not be reached at all
    #[error("could not connect to the local agent service at {url}; start it and try again")]
    ServiceUnavailable { url: String },

    /// The agent service answered but could not produce a transcript
    #[error("transcript error: {0}")]
    Transcript(String),

    /// The video has no transcript lines
    #[error("no transcript available for video {video_id}")]
    NoTranscript { video_id: String },

    /// The verification agent failed for one claim
    #[error("verification agent error: {0}")]
    Agent(String),

    /// Empty text, unrecognised video reference, etc.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A session was asked to run twice or skip a state
    #[error("invalid session transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON (de)serialization of persisted state failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FactCheckError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Whether the failure is fixed by the user changing configuration
    /// (adding a key, starting the local service) rather than retrying.
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            FactCheckError::Config(_) | FactCheckError::ServiceUnavailable { .. }
        )
    }
}

impl From<std::io::Error> for FactCheckError {
    fn from(err: std::io::Error) -> Self {
        FactCheckError::Storage(Box::new(err))
    }
}

/// Result type alias for fact-check operations.
pub type Result<T> = std::result::Result<T, FactCheckError>;
