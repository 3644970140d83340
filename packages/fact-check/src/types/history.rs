//! Persisted history records.

use serde::{Deserialize, Serialize};

use super::result::FactCheckResult;

/// Characters of input text kept in a history entry.
pub const HISTORY_TEXT_CHARS: usize = 200;

/// Default number of entries kept by history stores.
pub const HISTORY_CAPACITY: usize = 50;

/// A trimmed record of a past fact check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// First characters of the checked text
    pub text: String,

    /// Human summary of the result
    pub result: String,

    pub score: f64,

    /// Epoch milliseconds
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn new(text: impl Into<String>, result: impl Into<String>, score: f64, timestamp: i64) -> Self {
        Self {
            text: text.into(),
            result: result.into(),
            score,
            timestamp,
        }
    }

    /// Reduce a result to its history record.
    pub fn from_result(result: &FactCheckResult) -> Self {
        Self {
            text: result.input_text.chars().take(HISTORY_TEXT_CHARS).collect(),
            result: result.summary(),
            score: result.overall_score,
            timestamp: result.created_at.timestamp_millis(),
        }
    }
}

impl From<&FactCheckResult> for HistoryEntry {
    fn from(result: &FactCheckResult) -> Self {
        Self::from_result(result)
    }
}
