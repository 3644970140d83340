//! Claim Extraction and Verification Library
//!
//! Sends user-selected text or a video transcript to a generative-text
//! backend, turns the answer into claim records, verifies claims one by one
//! against a local agent service, and keeps a bounded history of past checks.
//!
//! # Design
//!
//! - Vendor choice is a value (`LlmBackend`), picked once from settings
//! - Errors are converted to data wherever processing must continue:
//!   unparseable backend output and per-claim agent failures never abort
//! - `NOT_FACTUAL` is a classification, not an error
//! - Session state is an explicit `CheckSession`, not ambient globals
//!
//! # Usage
//!
//! ```rust,ignore
//! use fact_check::{FactChecker, FactCheckConfig, LlmBackend, MemoryStore, Settings};
//!
//! let config = FactCheckConfig::from_env()?;
//! let backend = LlmBackend::from_settings(&Settings::from_env(), &config)?;
//! let checker = FactChecker::with_config(backend, MemoryStore::new(), config);
//!
//! let result = checker.check_text("The Great Wall is visible from space.").await?;
//! println!("{}", result.summary());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Capability traits (backend, agent, stores)
//! - [`types`] - Claims, results, history, settings, config
//! - [`pipeline`] - Extraction, verification, sessions and the checker
//! - [`backends`] - Gemini and OpenAI adapters
//! - [`agent`] - HTTP client for the local agent service
//! - [`stores`] - Storage implementations (MemoryStore, JsonFileStore)
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for testing

pub mod agent;
pub mod backends;
pub mod error;
pub mod pipeline;
pub mod security;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;
pub mod video;

// Re-export core types at crate root
pub use error::{FactCheckError, Result};
pub use traits::{
    agent::{TranscriptSource, VerificationAgent},
    backend::{GenerationRequest, GenerativeTextBackend},
    store::{HistoryStore, SettingsStore},
};
pub use types::{
    claim::{Claim, ClaimStatus, Source, StatusKind},
    config::FactCheckConfig,
    history::{HistoryEntry, HISTORY_CAPACITY, HISTORY_TEXT_CHARS},
    result::FactCheckResult,
    settings::{BackendKind, Settings},
    transcript::{format_transcript, TranscriptSegment},
};

// Re-export pipeline components
pub use pipeline::{
    // Entry point
    FactChecker,
    // Extraction
    extract_claims, extract_video_claims, parse_claim_report, truncate_input,
    // Verification
    parse_agent_response, verify_claim, verify_claims, Verification, AGENT_FALLBACK,
    // Sessions
    CheckSession, SessionEvent, SessionState,
};

pub use agent::AgentClient;
pub use backends::{GeminiBackend, LlmBackend, OpenAIBackend, NO_CREDENTIAL_MESSAGE};
pub use security::SecretString;
pub use stores::{JsonFileStore, MemoryStore};
pub use video::{extract_video_id, parse_video_id};

// Re-export testing utilities
pub use testing::{MockAgent, MockBackend};
