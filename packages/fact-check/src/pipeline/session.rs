//! Check sessions for the multi-step video pipeline.
//!
//! A session moves `Idle → Extracting → Verifying(i of N) → Done`, or from
//! `Extracting` to `Error`. Verification never errors, so `Error` is not
//! reachable from `Verifying`. A session runs once.

use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use uuid::Uuid;

use crate::error::{FactCheckError, Result};
use crate::types::{claim::Claim, result::FactCheckResult};

/// Where a session is in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Extracting,
    /// `current` is 1-based
    Verifying { current: usize, total: usize },
    Done,
    Error { message: String },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::Verifying { .. } => "verifying",
            Self::Done => "done",
            Self::Error { .. } => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error { .. })
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: &SessionState) -> bool {
        use SessionState::*;
        match (self, next) {
            (Idle, Extracting) => true,
            (Extracting, Verifying { current: 1, total }) => *total > 0,
            (Extracting, Done) | (Extracting, Error { .. }) => true,
            (Verifying { current, total }, Verifying { current: next, total: next_total }) => {
                next_total == total && *next == current + 1 && next <= total
            }
            (Verifying { current, total }, Done) => current == total,
            _ => false,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verifying { current, total } => write!(f, "verifying ({} of {})", current, total),
            Self::Error { message } => write!(f, "error: {}", message),
            other => f.write_str(other.name()),
        }
    }
}

/// Progress reported to whoever renders the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged(SessionState),
    /// User-facing notice such as "Verifying 3 claims…"
    Notice(String),
}

/// One video check: its state, claims so far and final result.
#[derive(Debug)]
pub struct CheckSession {
    id: Uuid,
    state: SessionState,
    claims: Vec<Claim>,
    result: Option<FactCheckResult>,
    progress: Option<UnboundedSender<SessionEvent>>,
}

impl Default for CheckSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            claims: Vec::new(),
            result: None,
            progress: None,
        }
    }

    /// Report state changes and notices on `tx`. A closed receiver is
    /// ignored; the session keeps running.
    pub fn with_progress(mut self, tx: UnboundedSender<SessionEvent>) -> Self {
        self.progress = Some(tx);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Extracted claims; verified once the session is `Done`.
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Final result once the session is `Done`.
    pub fn result(&self) -> Option<&FactCheckResult> {
        self.result.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    pub(crate) fn set_claims(&mut self, claims: Vec<Claim>) {
        self.claims = claims;
    }

    pub(crate) fn transition(&mut self, next: SessionState) -> Result<()> {
        if !self.state.can_transition_to(&next) {
            return Err(FactCheckError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }

        debug!(session_id = %self.id, from = %self.state, to = %next, "Session transition");
        self.state = next.clone();
        self.emit(SessionEvent::StateChanged(next));
        Ok(())
    }

    pub(crate) fn notice(&self, message: impl Into<String>) {
        self.emit(SessionEvent::Notice(message.into()));
    }

    /// Move to `Error`, recording `err` as the message.
    pub(crate) fn fail(&mut self, err: &FactCheckError) -> Result<()> {
        self.transition(SessionState::Error {
            message: err.to_string(),
        })
    }

    pub(crate) fn finish(&mut self, result: FactCheckResult) -> Result<()> {
        self.transition(SessionState::Done)?;
        self.claims = result.claims.clone();
        self.result = Some(result);
        Ok(())
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(event);
        }
    }
}
