//! LLM prompts for the fact-check pipeline.
//!
//! Both prompts ask for JSON so the extractor can parse the answer; the
//! `NOT_VERIFIABLE:` escape hatch covers backends that ignore the format
//! instruction for opinion-only input.

/// Marker a plain-text answer starts with when the input has no factual claim.
pub const NOT_VERIFIABLE_PREFIX: &str = "NOT_VERIFIABLE:";

/// Fused check: extract and verify in one round-trip.
pub const FACT_CHECK_PROMPT: &str = r#"You are a fact-checking assistant. Analyze the text below.

If the text contains no verifiable factual claim (opinion, question, greeting, fiction),
answer with:
{"status": "NOT_FACTUAL", "summary": "why there is nothing to check"}

Otherwise identify the factual claims and verify each one. Answer with JSON only:
{
    "status": "VERIFIED" | "DEBUNKED" | "PARTIALLY_TRUE" | "MISLEADING" | "UNVERIFIABLE",
    "summary": "one or two sentences on the overall accuracy",
    "correction": "the accurate version of anything false or misleading, or null",
    "confidence": 0.0 to 1.0,
    "sources": [
        {"name": "Publisher or page title", "domain": "example.org", "url": "https://..."}
    ],
    "claims": [
        {
            "text": "the claim as stated",
            "status": "VERIFIED" | "DEBUNKED" | "PARTIALLY_TRUE" | "MISLEADING" | "UNVERIFIABLE",
            "correction": "explanation or correction",
            "sources": [{"name": "...", "domain": "...", "url": "https://..."}]
        }
    ]
}

Rules:
- Only cite sources you are confident exist
- Order sources by relevance
- Do not wrap the JSON in markdown

Text:
"{text}""#;

/// Video pipeline: pull timestamped claims out of a transcript.
pub const VIDEO_CLAIMS_PROMPT: &str = r#"Below is a video transcript. Each line starts with its start time in seconds, e.g. [12.5s].

List every distinct factual claim a viewer might want checked. Skip opinions, jokes,
predictions and questions. Merge claims that repeat the same fact.

Answer with JSON only:
{
    "claims": [
        {"text": "the claim, rewritten to stand on its own", "timestamp": 12.5}
    ]
}

If there are no factual claims, answer with {"claims": []}.

Transcript:
{transcript}"#;

/// Format the fused-check prompt.
pub fn format_fact_check_prompt(text: &str) -> String {
    FACT_CHECK_PROMPT.replace("{text}", text)
}

/// Format the video claim-extraction prompt.
pub fn format_video_claims_prompt(transcript: &str) -> String {
    VIDEO_CLAIMS_PROMPT.replace("{transcript}", transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_filled() {
        let prompt = format_fact_check_prompt("The moon is made of cheese.");
        assert!(prompt.contains("\"The moon is made of cheese.\""));
        assert!(!prompt.contains("{text}"));

        let prompt = format_video_claims_prompt("[0.0s] hello");
        assert!(prompt.ends_with("[0.0s] hello"));
    }
}
