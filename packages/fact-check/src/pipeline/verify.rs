//! Claim verification against the local agent service.
//!
//! Verification never fails. Any agent error becomes the `Unverifiable`
//! fallback record, so one bad claim cannot abort a batch.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::traits::agent::VerificationAgent;
use crate::types::claim::{Claim, ClaimStatus, Source};

/// Correction used when the agent call fails.
pub const AGENT_FALLBACK: &str = "Could not verify with agent.";

const NO_SUMMARY: &str = "No search summary provided.";
const NO_VERIFICATION: &str = "Unverifiable";

static SECTION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[\s#>*_-]*(search summary|sources|verification)[*_\s]*:[*_]*").unwrap()
});

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>()\[\]"'`]+"#).unwrap());

/// Phrases mapped to statuses, most specific first.
const VERDICT_PHRASES: &[(&str, ClaimStatus)] = &[
    ("partially true", ClaimStatus::PartiallyTrue),
    ("partly true", ClaimStatus::PartiallyTrue),
    ("misleading", ClaimStatus::Misleading),
    ("not true", ClaimStatus::Debunked),
    ("untrue", ClaimStatus::Debunked),
    ("false", ClaimStatus::Debunked),
    ("true", ClaimStatus::Verified),
];

/// Outcome of verifying one claim.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub status: ClaimStatus,
    pub correction: String,
    pub sources: Vec<Source>,
}

impl Verification {
    /// The record used whenever the agent cannot answer.
    pub fn fallback() -> Self {
        Self {
            status: ClaimStatus::Unverifiable,
            correction: AGENT_FALLBACK.to_string(),
            sources: Vec::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }

    /// Copy the verdict onto a claim, keeping its text and timestamp.
    pub fn apply_to(self, claim: &mut Claim) {
        claim.status = self.status;
        claim.correction = Some(self.correction);
        claim.sources = self.sources;
    }
}

/// Map verification text to a status; the most specific phrase wins.
pub fn status_from_verification(text: &str) -> ClaimStatus {
    let text = text.to_lowercase();
    VERDICT_PHRASES
        .iter()
        .find(|(phrase, _)| text.contains(phrase))
        .map(|(_, status)| *status)
        .unwrap_or(ClaimStatus::Unverifiable)
}

/// Split agent output into its labeled sections. The first occurrence of
/// each label wins; a section runs until the next label.
fn sections(text: &str) -> (Option<&str>, Option<&str>, Option<&str>) {
    let labels: Vec<_> = SECTION_LABEL
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(0)?, caps.get(1)?.as_str().to_lowercase())))
        .collect();

    let (mut summary, mut sources, mut verification) = (None, None, None);
    for (i, (label, name)) in labels.iter().enumerate() {
        let end = labels.get(i + 1).map(|(next, _)| next.start()).unwrap_or(text.len());
        let body = text[label.end()..end].trim();
        let slot = match name.as_str() {
            "search summary" => &mut summary,
            "sources" => &mut sources,
            _ => &mut verification,
        };
        if slot.is_none() {
            *slot = Some(body);
        }
    }
    (summary, sources, verification)
}

/// Pull sources out of the "Sources:" section, one URL per source. The text
/// before a URL on the same line, if any, is the source name.
pub fn parse_sources(section: &str) -> Vec<Source> {
    let mut sources: Vec<Source> = Vec::new();
    for line in section.lines() {
        for found in URL.find_iter(line) {
            let url = found.as_str().trim_end_matches(['.', ',', ';', ':']);
            if sources.iter().any(|s| s.url.trim_end_matches('/') == url.trim_end_matches('/')) {
                continue;
            }

            let name = line[..found.start()]
                .trim()
                .trim_start_matches(|c: char| c.is_ascii_digit() || "-*•.)".contains(c))
                .trim_end_matches(|c: char| c.is_whitespace() || "-:([<".contains(c))
                .trim_matches(|c| c == '*' || c == '[' || c == ']')
                .trim();
            let name = (!name.is_empty()).then_some(name);

            if let Some(source) = Source::from_url(url, name) {
                sources.push(source);
            }
        }
    }
    sources
}

/// Parse the agent's labeled free text. Missing sections fall back to
/// placeholders.
pub fn parse_agent_response(text: &str) -> Verification {
    let (summary, sources, verification) = sections(text);

    let summary = summary.filter(|s| !s.is_empty()).unwrap_or(NO_SUMMARY);
    let verification = verification.filter(|s| !s.is_empty()).unwrap_or(NO_VERIFICATION);

    Verification {
        status: status_from_verification(verification),
        correction: summary.to_string(),
        sources: sources.map(parse_sources).unwrap_or_default(),
    }
}

/// Verify one claim. Never fails.
pub async fn verify_claim<A: VerificationAgent + ?Sized>(agent: &A, claim: &str) -> Verification {
    match agent.verify(claim).await {
        Ok(raw) => {
            let verification = parse_agent_response(&raw);
            debug!(
                status = %verification.status,
                sources = verification.sources.len(),
                "Verified claim"
            );
            verification
        }
        Err(e) => {
            warn!(error = %e, "Verification failed, using fallback");
            Verification::fallback()
        }
    }
}

/// Verify claims one at a time, in order. `on_progress(i, n)` is called
/// before claim `i` (1-based) is sent.
pub async fn verify_claims<A, F>(agent: &A, claims: &mut [Claim], mut on_progress: F)
where
    A: VerificationAgent + ?Sized,
    F: FnMut(usize, usize),
{
    let total = claims.len();
    for (i, claim) in claims.iter_mut().enumerate() {
        on_progress(i + 1, total);
        verify_claim(agent, &claim.text).await.apply_to(claim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGENT_TEXT: &str = "\
Search Summary: The Eiffel Tower is 330 metres tall after a 2022 antenna extension.

Sources:
1. Wikipedia - https://en.wikipedia.org/wiki/Eiffel_Tower
2. https://www.toureiffel.paris/en

Verification: Partially true. The height was 324 m before 2022.";

    #[test]
    fn test_parses_all_sections() {
        let v = parse_agent_response(AGENT_TEXT);
        assert_eq!(v.status, ClaimStatus::PartiallyTrue);
        assert!(v.correction.starts_with("The Eiffel Tower is 330 metres"));
        assert_eq!(v.sources.len(), 2);
        assert_eq!(v.sources[0].name, "Wikipedia");
        assert_eq!(v.sources[0].domain, "en.wikipedia.org");
        assert_eq!(v.sources[1].name, "toureiffel.paris");
    }

    #[test]
    fn test_missing_sections_use_placeholders() {
        let v = parse_agent_response("I could not find anything.");
        assert_eq!(v.status, ClaimStatus::Unverifiable);
        assert_eq!(v.correction, NO_SUMMARY);
        assert!(v.sources.is_empty());
    }

    #[test]
    fn test_markdown_labels() {
        let v = parse_agent_response("**Search Summary:** yes\n**Verification:** False");
        assert_eq!(v.status, ClaimStatus::Debunked);
        assert_eq!(v.correction, "yes");
    }

    #[test]
    fn test_most_specific_phrase_wins() {
        assert_eq!(status_from_verification("This is NOT TRUE"), ClaimStatus::Debunked);
        assert_eq!(status_from_verification("partially true"), ClaimStatus::PartiallyTrue);
        assert_eq!(status_from_verification("True."), ClaimStatus::Verified);
        assert_eq!(status_from_verification("False"), ClaimStatus::Debunked);
        assert_eq!(status_from_verification("cannot be determined"), ClaimStatus::Unverifiable);
    }

    #[test]
    fn test_duplicate_urls_collapsed() {
        let sources = parse_sources("https://a.org/x\nsee https://a.org/x/ again");
        assert_eq!(sources.len(), 1);
    }

    #[test]
    fn test_fallback_record() {
        let v = Verification::fallback();
        assert_eq!(v.status, ClaimStatus::Unverifiable);
        assert_eq!(v.correction, "Could not verify with agent.");
        assert!(v.is_fallback());
    }
}
