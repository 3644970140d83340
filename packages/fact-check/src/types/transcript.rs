//! Video transcript lines.

use serde::{Deserialize, Serialize};

/// One time-tagged transcript line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Seconds from the start of the video
    pub start: f64,

    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl TranscriptSegment {
    pub fn new(start: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            text: text.into(),
            duration: None,
        }
    }
}

/// Join segments as `[12.5s] text` lines so the backend can cite timestamps.
///
/// Blank lines are dropped.
pub fn format_transcript(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .filter(|s| !s.text.trim().is_empty())
        .map(|s| format!("[{:.1}s] {}", s.start, s.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_transcript() {
        let segments = vec![
            TranscriptSegment::new(0.0, "Hello everyone"),
            TranscriptSegment::new(3.25, "  "),
            TranscriptSegment::new(12.5, " The moon is 384,400 km away. "),
        ];
        assert_eq!(
            format_transcript(&segments),
            "[0.0s] Hello everyone\n[12.5s] The moon is 384,400 km away."
        );
    }

    #[test]
    fn test_deserialize_agent_shape() {
        let raw = r#"[{"text": "hi", "start": 1.5, "duration": 2.0}, {"text": "there", "start": 3.5}]"#;
        let segments: Vec<TranscriptSegment> = serde_json::from_str(raw).unwrap();
        assert_eq!(segments[0].duration, Some(2.0));
        assert_eq!(segments[1].duration, None);
    }
}
