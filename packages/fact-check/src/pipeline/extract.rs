//! Claim extraction - prompt the backend and parse its answer.
//!
//! Parsing never fails: malformed or unexpected output becomes a single
//! `Unknown` claim carrying the raw text, with `parse_error` set on the
//! result.

use llm_client::{strip_code_blocks, StructuredOutput};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::error::{FactCheckError, Result};
use crate::pipeline::prompts::{
    format_fact_check_prompt, format_video_claims_prompt, NOT_VERIFIABLE_PREFIX,
};
use crate::traits::backend::{GenerationRequest, GenerativeTextBackend};
use crate::types::{
    claim::{Claim, ClaimStatus, Source},
    config::FactCheckConfig,
    result::FactCheckResult,
};

/// Claim report as returned by the backend (before transformation).
///
/// Two shapes are accepted: a single verdict (`status` at the top level) or
/// a `claims` list. Top-level `confidence` applies to either.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ClaimReport {
    pub status: Option<String>,

    pub summary: Option<String>,

    pub correction: Option<String>,

    #[serde(default, deserialize_with = "lenient_confidence")]
    #[schemars(with = "Option<f64>")]
    pub confidence: Option<f64>,

    pub sources: Option<Vec<ReportSource>>,

    /// The claim a single verdict is about
    pub claim: Option<String>,

    pub claims: Option<Vec<ReportClaim>>,
}

/// A source from the backend response.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReportSource {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub url: Option<String>,
}

/// One claim from a `claims` list.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReportClaim {
    pub text: String,

    /// Seconds into the video
    pub timestamp: Option<f64>,

    pub status: Option<String>,

    pub correction: Option<String>,

    pub sources: Option<Vec<ReportSource>>,
}

/// Accept `0.8`, `"0.8"`, `80` or `"80%"`; anything else is absent.
fn lenient_confidence<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let number = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| if n > 1.0 && n <= 100.0 { n / 100.0 } else { n }))
}

impl ReportSource {
    fn into_source(self) -> Option<Source> {
        let url = self.url.as_deref().map(str::trim).unwrap_or_default();
        if let Some(mut source) = Source::from_url(url, self.name.as_deref()) {
            if let Some(domain) = self.domain.filter(|d| !d.trim().is_empty()) {
                source.domain = domain.trim().to_string();
            }
            return Some(source);
        }

        // No usable URL: keep a named source, drop an empty one
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        Some(Source::new(
            name.trim(),
            self.domain.unwrap_or_default(),
            url,
        ))
    }
}

fn convert_sources(sources: Option<Vec<ReportSource>>) -> Vec<Source> {
    sources
        .unwrap_or_default()
        .into_iter()
        .filter_map(ReportSource::into_source)
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Top-level verdict fields a listed claim falls back on when it has none
/// of its own.
struct Verdict {
    status: Option<ClaimStatus>,
    correction: Option<String>,
    sources: Vec<Source>,
}

impl ReportClaim {
    fn into_claim(self, verdict: &Verdict) -> Option<Claim> {
        let text = self.text.trim();
        if text.is_empty() {
            return None;
        }

        let status = self
            .status
            .as_deref()
            .map(ClaimStatus::parse)
            .or(verdict.status)
            .unwrap_or_default();
        let sources = match convert_sources(self.sources) {
            own if own.is_empty() => verdict.sources.clone(),
            own => own,
        };

        let mut claim = Claim::new(text).with_status(status).with_sources(sources);
        if let Some(seconds) = self.timestamp.filter(|t| t.is_finite() && *t >= 0.0) {
            claim = claim.with_timestamp(seconds);
        }
        if let Some(correction) = non_blank(self.correction).or_else(|| verdict.correction.clone()) {
            claim = claim.with_correction(correction);
        }
        Some(claim)
    }
}

impl ClaimReport {
    /// Convert to claims, or `None` when the shape is neither a single
    /// verdict nor a claims list.
    ///
    /// A non-empty `claims` list wins over a top-level verdict, but listed
    /// claims missing a status, correction or sources take the verdict's.
    /// An empty list counts only when there is no verdict either.
    fn into_claims(self, input_text: &str) -> Option<Vec<Claim>> {
        let verdict = Verdict {
            status: self.status.as_deref().map(ClaimStatus::parse),
            correction: non_blank(self.correction).or_else(|| non_blank(self.summary)),
            sources: convert_sources(self.sources),
        };

        let status = match (self.claims, verdict.status) {
            (Some(claims), _) if !claims.is_empty() => {
                return Some(
                    claims
                        .into_iter()
                        .filter_map(|c| c.into_claim(&verdict))
                        .collect(),
                );
            }
            (_, Some(status)) => status,
            (Some(_), None) => return Some(Vec::new()),
            (None, None) => return None,
        };

        let text = non_blank(self.claim).unwrap_or_else(|| input_text.to_string());
        let mut claim = Claim::new(text).with_status(status).with_sources(verdict.sources);
        if let Some(correction) = verdict.correction {
            claim = claim.with_correction(correction);
        }
        Some(vec![claim])
    }
}

/// Cut `text` to at most `max_chars` characters, preferring the last
/// whitespace boundary inside the budget.
pub fn truncate_input(text: &str, max_chars: usize) -> &str {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text;
    };

    let head = &text[..cut];
    // The cut already falls between words
    if text[cut..].starts_with(char::is_whitespace) {
        return head.trim_end();
    }
    match head.rfind(char::is_whitespace) {
        Some(boundary) if !head[..boundary].trim().is_empty() => head[..boundary].trim_end(),
        _ => head,
    }
}

/// Parse a backend answer into a result. Never fails.
pub fn parse_claim_report(input_text: &str, raw: &str) -> FactCheckResult {
    let text = strip_code_blocks(raw).trim();

    if let Some(explanation) = text.strip_prefix(NOT_VERIFIABLE_PREFIX) {
        let mut claim = Claim::new(input_text).with_status(ClaimStatus::NotFactual);
        if !explanation.trim().is_empty() {
            claim = claim.with_correction(explanation.trim());
        }
        return FactCheckResult::new(input_text, vec![claim], None);
    }

    let report: ClaimReport = match serde_json::from_str(text) {
        Ok(report) => report,
        Err(e) => return unparsed(input_text, raw, e.to_string()),
    };

    let confidence = report.confidence;
    match report.into_claims(input_text) {
        Some(claims) => FactCheckResult::new(input_text, claims, confidence),
        None => unparsed(
            input_text,
            raw,
            "response has neither a status nor a claims list".to_string(),
        ),
    }
}

fn unparsed(input_text: &str, raw: &str, reason: String) -> FactCheckResult {
    warn!(error = %reason, raw_len = raw.len(), "Could not parse backend response");
    let claim = Claim::new(input_text)
        .with_status(ClaimStatus::Unknown)
        .with_correction(raw);
    let mut result = FactCheckResult::new(input_text, vec![claim], None);
    result.parse_error = Some(reason);
    result
}

fn generation_request(prompt: String, config: &FactCheckConfig) -> GenerationRequest {
    GenerationRequest::new(prompt)
        .with_temperature(config.temperature)
        .with_max_output_tokens(config.max_output_tokens)
        .with_schema(ClaimReport::strict_schema())
}

async fn run<B: GenerativeTextBackend + ?Sized>(
    backend: &B,
    source_text: &str,
    config: &FactCheckConfig,
    prompt: fn(&str) -> String,
) -> Result<FactCheckResult> {
    if source_text.trim().is_empty() {
        return Err(FactCheckError::invalid_input("nothing to check: text is empty"));
    }

    let text = truncate_input(source_text, config.max_input_chars);
    if text.len() < source_text.len() {
        debug!(
            original_chars = source_text.chars().count(),
            kept_chars = text.chars().count(),
            "Truncated input"
        );
    }

    let raw = backend.generate(&generation_request(prompt(text), config)).await?;
    let result = parse_claim_report(text, &raw).with_backend(backend.name());

    debug!(
        backend = backend.name(),
        claims = result.claims.len(),
        parsed = result.parse_error.is_none(),
        "Extracted claims"
    );
    Ok(result)
}

/// Fused check: extract and verify `source_text` in one backend call.
///
/// Backend failures propagate; parse failures do not.
pub async fn extract_claims<B: GenerativeTextBackend + ?Sized>(
    backend: &B,
    source_text: &str,
    config: &FactCheckConfig,
) -> Result<FactCheckResult> {
    run(backend, source_text, config, format_fact_check_prompt).await
}

/// Extract timestamped claims from a formatted transcript. The claims come
/// back unverified (`Unknown`).
pub async fn extract_video_claims<B: GenerativeTextBackend + ?Sized>(
    backend: &B,
    transcript: &str,
    config: &FactCheckConfig,
) -> Result<FactCheckResult> {
    run(backend, transcript, config, format_video_claims_prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_verdict() {
        let raw = r#"{"status":"DEBUNKED","summary":"It is rock.","correction":"The moon is rock.","confidence":0.95,
            "sources":[{"name":"NASA","domain":"nasa.gov","url":"https://www.nasa.gov/moon"}]}"#;
        let result = parse_claim_report("The moon is cheese.", raw);

        assert!(result.parse_error.is_none());
        assert_eq!(result.claims.len(), 1);
        let claim = &result.claims[0];
        assert_eq!(claim.text, "The moon is cheese.");
        assert_eq!(claim.status, ClaimStatus::Debunked);
        assert_eq!(claim.correction.as_deref(), Some("The moon is rock."));
        assert_eq!(claim.sources[0].domain, "nasa.gov");
        assert!((result.overall_score - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn test_not_factual_uses_summary_as_correction() {
        let result = parse_claim_report("I love Mondays", r#"{"status":"NOT_FACTUAL","summary":"opinion, no claim"}"#);
        assert_eq!(result.claims.len(), 1);
        assert_eq!(result.claims[0].status, ClaimStatus::NotFactual);
        assert_eq!(result.claims[0].correction.as_deref(), Some("opinion, no claim"));
        assert!(result.is_not_factual());
        assert!(result.parse_error.is_none());
    }

    #[test]
    fn test_not_verifiable_prefix() {
        let result = parse_claim_report("nice weather", "NOT_VERIFIABLE: This is small talk.");
        assert_eq!(result.claims[0].status, ClaimStatus::NotFactual);
        assert_eq!(result.claims[0].correction.as_deref(), Some("This is small talk."));
    }

    #[test]
    fn test_malformed_json_keeps_raw_text() {
        let result = parse_claim_report("some text", "not json");
        assert_eq!(result.claims.len(), 1);
        assert_eq!(result.claims[0].status, ClaimStatus::Unknown);
        assert_eq!(result.claims[0].correction.as_deref(), Some("not json"));
        assert!(result.claims[0].sources.is_empty());
        assert!(result.parse_error.is_some());
    }

    #[test]
    fn test_unexpected_shape_is_parse_error() {
        let result = parse_claim_report("some text", r#"{"verdict": "yes"}"#);
        assert_eq!(result.claims[0].status, ClaimStatus::Unknown);
        assert_eq!(result.claims[0].correction.as_deref(), Some(r#"{"verdict": "yes"}"#));
        assert!(result.parse_error.is_some());
    }

    #[test]
    fn test_fenced_claims_list() {
        let raw = "```json\n{\"claims\": [{\"text\": \"Water boils at 100C\", \"timestamp\": 12.5}, {\"text\": \"  \"}]}\n```";
        let result = parse_claim_report("[12.5s] water boils at 100C", raw);

        assert!(result.parse_error.is_none());
        assert_eq!(result.claims.len(), 1);
        assert_eq!(result.claims[0].timestamp, Some(12.5));
        assert_eq!(result.claims[0].status, ClaimStatus::Unknown);
    }

    #[test]
    fn test_listed_claims_inherit_top_level_verdict() {
        let raw = r#"{"status":"DEBUNKED","summary":"The wall is too narrow to see.",
            "sources":[{"name":"NASA","domain":"nasa.gov","url":"https://www.nasa.gov/great-wall"}],
            "claims":[
                {"text":"The Great Wall is visible from space","status":"DEBUNKED"},
                {"text":"It is 21,000 km long","status":"VERIFIED","correction":"Measured in 2012.",
                 "sources":[{"name":"Xinhua","url":"https://www.xinhuanet.com/wall"}]},
                {"text":"It was built in one dynasty"}
            ]}"#;
        let result = parse_claim_report("The Great Wall is visible from space.", raw);

        assert!(result.parse_error.is_none());
        assert_eq!(result.claims.len(), 3);

        let first = &result.claims[0];
        assert_eq!(first.correction.as_deref(), Some("The wall is too narrow to see."));
        assert_eq!(first.sources.len(), 1);
        assert_eq!(first.sources[0].domain, "nasa.gov");

        // Own values are kept
        let second = &result.claims[1];
        assert_eq!(second.status, ClaimStatus::Verified);
        assert_eq!(second.correction.as_deref(), Some("Measured in 2012."));
        assert_eq!(second.sources[0].name, "Xinhua");

        assert_eq!(result.claims[2].status, ClaimStatus::Debunked);
    }

    #[test]
    fn test_unlisted_status_stays_unknown_without_verdict() {
        let result = parse_claim_report("x", r#"{"claims":[{"text":"Honey never spoils"}]}"#);
        assert_eq!(result.claims[0].status, ClaimStatus::Unknown);
        assert!(result.claims[0].correction.is_none());
        assert!(result.claims[0].sources.is_empty());
    }

    #[test]
    fn test_explicit_empty_claims() {
        let result = parse_claim_report("hello", r#"{"claims": []}"#);
        assert!(result.claims.is_empty());
        assert!(result.parse_error.is_none());
    }

    #[test]
    fn test_confidence_variants() {
        for (raw, expected) in [
            (r#"{"status":"TRUE","confidence":"0.7"}"#, 0.7),
            (r#"{"status":"TRUE","confidence":85}"#, 0.85),
            (r#"{"status":"TRUE","confidence":"High"}"#, 0.9),
        ] {
            let result = parse_claim_report("x", raw);
            assert!((result.overall_score - expected).abs() < 1e-9, "{}", raw);
        }
    }

    #[test]
    fn test_truncate_prefers_word_boundary() {
        assert_eq!(truncate_input("hello world again", 13), "hello world");
        assert_eq!(truncate_input("hello world", 5), "hello");
        assert_eq!(truncate_input("short", 30), "short");
        assert_eq!(truncate_input("abcdefghij", 4), "abcd");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "héllo wörld";
        assert_eq!(truncate_input(text, 8), "héllo");
    }
}
