//! Local agent service traits.
//!
//! The agent service is external: it performs web-search-backed
//! verification of one claim and serves video transcripts.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::transcript::TranscriptSegment;

/// Verifies a single claim and returns the agent's free-text findings.
#[async_trait]
pub trait VerificationAgent: Send + Sync {
    /// Raw labeled text ("Search Summary:", "Sources:", "Verification:").
    async fn verify(&self, claim: &str) -> Result<String>;
}

/// Supplies time-tagged transcripts for videos.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptSegment>>;
}
