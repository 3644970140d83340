//! YouTube video reference parsing.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{FactCheckError, Result};

const VIDEO_ID_LEN: usize = 11;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*").unwrap()
});

static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

/// Extract the 11-character video id from a URL or a bare id.
pub fn extract_video_id(reference: &str) -> Option<String> {
    let reference = reference.trim();
    if BARE_ID.is_match(reference) {
        return Some(reference.to_string());
    }

    URL_PATTERN
        .captures(reference)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
        .filter(|id| id.len() == VIDEO_ID_LEN)
        .map(str::to_string)
}

/// Like [`extract_video_id`], but an unrecognised reference is an error.
pub fn parse_video_id(reference: &str) -> Result<String> {
    extract_video_id(reference).ok_or_else(|| {
        FactCheckError::invalid_input(format!("not a YouTube video reference: {:?}", reference))
    })
}
