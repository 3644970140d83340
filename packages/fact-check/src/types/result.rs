//! The aggregate result of one fact-check invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::claim::{Claim, ClaimStatus};

/// Result of one fact check: one highlighted passage, or all claims of one
/// video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactCheckResult {
    pub id: Uuid,

    pub input_text: String,

    /// Claims in source order
    pub claims: Vec<Claim>,

    /// Confidence in [0, 1]
    pub overall_score: f64,

    pub created_at: DateTime<Utc>,

    /// Set when the backend output could not be parsed; the raw text is then
    /// kept as the correction of a single `Unknown` claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,

    /// Backend that produced the result (e.g. "gemini")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

impl FactCheckResult {
    /// Build a result; `confidence` is the backend's structured confidence,
    /// if it reported one.
    pub fn new(input_text: impl Into<String>, claims: Vec<Claim>, confidence: Option<f64>) -> Self {
        let mut result = Self {
            id: Uuid::new_v4(),
            input_text: input_text.into(),
            claims,
            overall_score: 0.0,
            created_at: Utc::now(),
            parse_error: None,
            backend: None,
        };
        result.rescore(confidence);
        result
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    /// Recompute `overall_score`, preferring a structured confidence.
    pub fn rescore(&mut self, confidence: Option<f64>) {
        self.overall_score = match confidence.filter(|c| c.is_finite()) {
            Some(c) => c.clamp(0.0, 1.0),
            None => self
                .dominant_status()
                .map(|s| s.baseline_score())
                .unwrap_or(0.0),
        };
    }

    /// Most frequent status; ties go to the status seen first.
    pub fn dominant_status(&self) -> Option<ClaimStatus> {
        let mut counts: Vec<(ClaimStatus, usize)> = Vec::new();
        for claim in &self.claims {
            match counts.iter_mut().find(|(s, _)| *s == claim.status) {
                Some((_, n)) => *n += 1,
                None => counts.push((claim.status, 1)),
            }
        }
        // max_by_key keeps the last maximum, so walk in reverse to favour the first
        counts
            .into_iter()
            .rev()
            .max_by_key(|(_, n)| *n)
            .map(|(s, _)| s)
    }

    /// Whether the backend classified the whole input as non-factual.
    pub fn is_not_factual(&self) -> bool {
        !self.claims.is_empty() && self.claims.iter().all(|c| c.status == ClaimStatus::NotFactual)
    }

    pub fn count(&self, status: ClaimStatus) -> usize {
        self.claims.iter().filter(|c| c.status == status).count()
    }

    /// One-line human summary, used for history entries.
    pub fn summary(&self) -> String {
        match self.claims.as_slice() {
            [] => "No factual claims found.".to_string(),
            [claim] => match &claim.correction {
                Some(correction) if !correction.trim().is_empty() => {
                    format!("{}: {}", claim.status.label(), correction.trim())
                }
                _ => claim.status.label().to_string(),
            },
            claims => {
                let order = [
                    ClaimStatus::Verified,
                    ClaimStatus::Debunked,
                    ClaimStatus::PartiallyTrue,
                    ClaimStatus::Misleading,
                    ClaimStatus::Unverifiable,
                    ClaimStatus::NotFactual,
                    ClaimStatus::Unknown,
                ];
                let parts: Vec<String> = order
                    .iter()
                    .filter_map(|status| {
                        let n = self.count(*status);
                        (n > 0).then(|| format!("{} {}", n, status.label().to_lowercase()))
                    })
                    .collect();
                format!("{} claims: {}", claims.len(), parts.join(", "))
            }
        }
    }
}
