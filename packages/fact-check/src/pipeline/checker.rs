//! The FactChecker - main entry point for the fact-check library.
//!
//! Two flows share one backend and one history store:
//! - `check_text()` - fused check of a passage in one backend call
//! - `check_video()` - transcript, claim extraction, then sequential
//!   per-claim verification, tracked by a [`CheckSession`]

use tracing::{info, warn};

use crate::backends::LlmBackend;
use crate::error::{FactCheckError, Result};
use crate::pipeline::{
    extract::{extract_claims, extract_video_claims},
    session::{CheckSession, SessionState},
    verify::verify_claims,
};
use crate::traits::{
    agent::{TranscriptSource, VerificationAgent},
    backend::GenerativeTextBackend,
    store::HistoryStore,
};
use crate::types::{
    config::FactCheckConfig,
    history::HistoryEntry,
    result::FactCheckResult,
    settings::Settings,
    transcript::format_transcript,
};
use crate::video::parse_video_id;

/// Runs fact checks and records them in history.
///
/// # Example
///
/// ```rust,ignore
/// let backend = LlmBackend::from_settings(&settings, &config)?;
/// let checker = FactChecker::with_config(backend, MemoryStore::new(), config);
///
/// let result = checker.check_text("The Great Wall is visible from space.").await?;
///
/// let mut session = CheckSession::new();
/// let agent = AgentClient::from_config(checker.config())?;
/// checker.check_video(&mut session, "https://youtu.be/dQw4w9WgXcQ", &agent, &agent).await?;
/// ```
pub struct FactChecker<B: GenerativeTextBackend, H: HistoryStore> {
    backend: B,
    history: H,
    config: FactCheckConfig,
}

impl<H: HistoryStore> FactChecker<LlmBackend, H> {
    /// Select the backend from `settings` for a session.
    ///
    /// With no usable key the session ends in `Error` and the configuration
    /// error is returned.
    pub fn for_session(
        session: &mut CheckSession,
        settings: &Settings,
        history: H,
        config: FactCheckConfig,
    ) -> Result<Self> {
        match LlmBackend::from_settings(settings, &config) {
            Ok(backend) => Ok(Self::with_config(backend, history, config)),
            Err(err) => {
                session.transition(SessionState::Extracting)?;
                session.fail(&err)?;
                Err(err)
            }
        }
    }
}

impl<B: GenerativeTextBackend, H: HistoryStore> FactChecker<B, H> {
    pub fn new(backend: B, history: H) -> Self {
        Self::with_config(backend, history, FactCheckConfig::default())
    }

    pub fn with_config(backend: B, history: H, config: FactCheckConfig) -> Self {
        Self {
            backend,
            history,
            config,
        }
    }

    pub fn config(&self) -> &FactCheckConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Fused check of one passage.
    ///
    /// Backend failures are returned; unparseable output and `NOT_FACTUAL`
    /// come back as data. The result is appended to history.
    pub async fn check_text(&self, text: &str) -> Result<FactCheckResult> {
        let result = extract_claims(&self.backend, text, &self.config).await?;
        info!(
            backend = self.backend.name(),
            claims = result.claims.len(),
            score = result.overall_score,
            "Fact check complete"
        );
        self.record(&result).await;
        Ok(result)
    }

    /// Multi-step video check.
    ///
    /// Fatal failures (bad video reference, transcript fetch failure, empty
    /// transcript, backend error) end the session in `Error` and are
    /// returned. Per-claim verification failures are absorbed.
    pub async fn check_video<T, A>(
        &self,
        session: &mut CheckSession,
        video_ref: &str,
        transcripts: &T,
        agent: &A,
    ) -> Result<FactCheckResult>
    where
        T: TranscriptSource + ?Sized,
        A: VerificationAgent + ?Sized,
    {
        session.transition(SessionState::Extracting)?;

        let mut result = match self.extract_from_video(video_ref, transcripts).await {
            Ok(result) => result,
            Err(err) => {
                warn!(session_id = %session.id(), error = %err, "Video check failed");
                session.fail(&err)?;
                return Err(err);
            }
        };

        // Nothing to verify in unparsed output or opinion-only input
        let verify = result.parse_error.is_none()
            && !result.is_not_factual()
            && !result.claims.is_empty();
        if verify {
            session.set_claims(result.claims.clone());
            session.notice(format!("Verifying {} claims…", result.claims.len()));

            let mut claims = std::mem::take(&mut result.claims);
            let mut progress = Ok(());
            verify_claims(agent, &mut claims, |current, total| {
                if progress.is_ok() {
                    progress = session.transition(SessionState::Verifying { current, total });
                }
            })
            .await;
            progress?;

            result.claims = claims;
            result.rescore(None);
        }

        session.finish(result.clone())?;
        info!(
            session_id = %session.id(),
            claims = result.claims.len(),
            score = result.overall_score,
            "Video check complete"
        );
        self.record(&result).await;
        Ok(result)
    }

    async fn extract_from_video<T: TranscriptSource + ?Sized>(
        &self,
        video_ref: &str,
        transcripts: &T,
    ) -> Result<FactCheckResult> {
        let video_id = parse_video_id(video_ref)?;
        let segments = transcripts.fetch_transcript(&video_id).await?;

        let transcript = format_transcript(&segments);
        if transcript.trim().is_empty() {
            return Err(FactCheckError::NoTranscript { video_id });
        }

        extract_video_claims(&self.backend, &transcript, &self.config).await
    }

    /// Append a history entry. Storage failures are logged, not returned.
    async fn record(&self, result: &FactCheckResult) {
        if let Err(e) = self.history.append(HistoryEntry::from_result(result)).await {
            warn!(error = %e, "Failed to save history entry");
        }
    }
}
