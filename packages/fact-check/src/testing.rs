//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the fact-check library
//! without making real backend or agent calls.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, RwLock};

use crate::error::{FactCheckError, Result};
use crate::traits::{
    agent::{TranscriptSource, VerificationAgent},
    backend::{GenerationRequest, GenerativeTextBackend},
};
use crate::types::transcript::TranscriptSegment;

/// A mock generative backend.
///
/// Responses are served from a queue; once it is empty the default response
/// is returned. Useful for testing parsing and orchestration without real
/// LLM calls.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Queued responses, served first-in first-out
    responses: Arc<RwLock<VecDeque<String>>>,

    /// Returned when the queue is empty
    default_response: Arc<RwLock<Option<String>>>,

    /// When set, every call fails with this message
    failure: Arc<RwLock<Option<String>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockBackendCall>>>,
}

/// Record of a call made to the mock backend.
#[derive(Debug, Clone)]
pub struct MockBackendCall {
    pub prompt: String,
    pub json_output: bool,
    pub has_schema: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.write().unwrap().push_back(response.into());
        self
    }

    /// Response used once the queue is drained.
    pub fn with_default_response(self, response: impl Into<String>) -> Self {
        *self.default_response.write().unwrap() = Some(response.into());
        self
    }

    /// Make every call fail as a network error would.
    pub fn failing(self, message: impl Into<String>) -> Self {
        *self.failure.write().unwrap() = Some(message.into());
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockBackendCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl GenerativeTextBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.write().unwrap().push(MockBackendCall {
            prompt: request.prompt.clone(),
            json_output: request.json_output,
            has_schema: request.response_schema.is_some(),
        });

        if let Some(message) = self.failure.read().unwrap().clone() {
            return Err(llm_client::LlmError::Network(message).into());
        }

        if let Some(response) = self.responses.write().unwrap().pop_front() {
            return Ok(response);
        }

        self.default_response
            .read()
            .unwrap()
            .clone()
            .ok_or_else(|| llm_client::LlmError::EmptyResponse { provider: "mock" }.into())
    }
}

/// Build agent output in the labeled format the verifier parses.
pub fn agent_response(summary: &str, sources: &[(&str, &str)], verification: &str) -> String {
    let sources: Vec<String> = sources
        .iter()
        .enumerate()
        .map(|(i, (name, url))| format!("{}. {} - {}", i + 1, name, url))
        .collect();
    format!(
        "Search Summary: {}\n\nSources:\n{}\n\nVerification: {}",
        summary,
        sources.join("\n"),
        verification
    )
}

/// A mock local agent service serving both `/verify` and `/transcript`.
#[derive(Clone, Default)]
pub struct MockAgent {
    /// Agent output by claim text
    verdicts: Arc<RwLock<HashMap<String, String>>>,

    /// Output for claims without a predefined verdict
    default_verdict: Arc<RwLock<Option<String>>>,

    /// Claims whose verification fails
    failing_claims: Arc<RwLock<HashSet<String>>>,

    /// Transcripts by video id
    transcripts: Arc<RwLock<HashMap<String, Vec<TranscriptSegment>>>>,

    /// Simulate the service not running
    unavailable: Arc<RwLock<bool>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockAgentCall>>>,
}

/// Record of a call made to the mock agent.
#[derive(Debug, Clone, PartialEq)]
pub enum MockAgentCall {
    Verify { claim: String },
    Transcript { video_id: String },
}

impl MockAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predefined verdict for a claim.
    pub fn with_verdict(self, claim: impl Into<String>, response: impl Into<String>) -> Self {
        self.verdicts
            .write()
            .unwrap()
            .insert(claim.into(), response.into());
        self
    }

    pub fn with_default_verdict(self, response: impl Into<String>) -> Self {
        *self.default_verdict.write().unwrap() = Some(response.into());
        self
    }

    /// Make verification of `claim` fail.
    pub fn with_failing_claim(self, claim: impl Into<String>) -> Self {
        self.failing_claims.write().unwrap().insert(claim.into());
        self
    }

    /// Add a transcript for a video id.
    pub fn with_transcript(self, video_id: impl Into<String>, segments: Vec<TranscriptSegment>) -> Self {
        self.transcripts
            .write()
            .unwrap()
            .insert(video_id.into(), segments);
        self
    }

    /// Behave as if the local service is not running.
    pub fn unavailable(self) -> Self {
        *self.unavailable.write().unwrap() = true;
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockAgentCall> {
        self.calls.read().unwrap().clone()
    }

    /// Claims sent to `/verify`, in call order.
    pub fn verified_claims(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockAgentCall::Verify { claim } => Some(claim),
                MockAgentCall::Transcript { .. } => None,
            })
            .collect()
    }

    fn check_available(&self) -> Result<()> {
        if *self.unavailable.read().unwrap() {
            return Err(FactCheckError::ServiceUnavailable {
                url: "mock://agent".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VerificationAgent for MockAgent {
    async fn verify(&self, claim: &str) -> Result<String> {
        self.calls.write().unwrap().push(MockAgentCall::Verify {
            claim: claim.to_string(),
        });
        self.check_available()?;

        if self.failing_claims.read().unwrap().contains(claim) {
            return Err(FactCheckError::Agent("Server error: 500".to_string()));
        }

        let verdict = self.verdicts.read().unwrap().get(claim).cloned();
        verdict
            .or_else(|| self.default_verdict.read().unwrap().clone())
            .ok_or_else(|| FactCheckError::Agent(format!("no verdict for {:?}", claim)))
    }
}

#[async_trait]
impl TranscriptSource for MockAgent {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptSegment>> {
        self.calls.write().unwrap().push(MockAgentCall::Transcript {
            video_id: video_id.to_string(),
        });
        self.check_available()?;

        self.transcripts
            .read()
            .unwrap()
            .get(video_id)
            .cloned()
            .ok_or_else(|| FactCheckError::Transcript("Could not retrieve a transcript".to_string()))
    }
}
