//! Fact-check pipeline.
//!
//! The pipeline orchestrates:
//! - Claim extraction (fused single-call check, or timestamped video claims)
//! - Per-claim verification against the local agent, strictly sequential
//! - Session state for the video pipeline

pub mod checker;
pub mod extract;
pub mod prompts;
pub mod session;
pub mod verify;

pub use checker::FactChecker;
pub use extract::{
    extract_claims, extract_video_claims, parse_claim_report, truncate_input, ClaimReport,
    ReportClaim, ReportSource,
};
pub use prompts::{
    format_fact_check_prompt, format_video_claims_prompt, FACT_CHECK_PROMPT,
    NOT_VERIFIABLE_PREFIX, VIDEO_CLAIMS_PROMPT,
};
pub use session::{CheckSession, SessionEvent, SessionState};
pub use verify::{
    parse_agent_response, parse_sources, status_from_verification, verify_claim, verify_claims,
    Verification, AGENT_FALLBACK,
};
