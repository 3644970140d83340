//! User settings: vendor credentials and backend preference.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::security::SecretString;

/// Which generative-text vendor to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Google Gemini (primary)
    #[default]
    Gemini,
    /// OpenAI (secondary)
    OpenAi,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" | "chatgpt" | "gpt" => Ok(Self::OpenAi),
            other => Err(format!("unknown model preference: {}", other)),
        }
    }
}

/// Credentials and preference, as kept in the settings namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub gemini_api_key: Option<SecretString>,
    pub openai_api_key: Option<SecretString>,
    pub preferred_model: BackendKind,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gemini_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = SecretString::non_empty(key);
        self
    }

    pub fn with_openai_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = SecretString::non_empty(key);
        self
    }

    pub fn with_preferred_model(mut self, model: BackendKind) -> Self {
        self.preferred_model = model;
        self
    }

    /// Read credentials from `GOOGLE_API_KEY`/`GEMINI_API_KEY`,
    /// `OPENAI_API_KEY` and `PREFERRED_MODEL`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let gemini = std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok()
            .and_then(SecretString::non_empty);
        let openai = std::env::var("OPENAI_API_KEY")
            .ok()
            .and_then(SecretString::non_empty);
        let preferred_model = std::env::var("PREFERRED_MODEL")
            .ok()
            .and_then(|m| m.parse().ok())
            .unwrap_or_default();

        Self {
            gemini_api_key: gemini,
            openai_api_key: openai,
            preferred_model,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.gemini_api_key.is_some() || self.openai_api_key.is_some()
    }

    /// The vendor a check should use: the preferred one when OpenAI is
    /// preferred and keyed, otherwise Gemini, otherwise OpenAI.
    pub fn resolve_backend(&self) -> Option<(BackendKind, &SecretString)> {
        match (self.preferred_model, &self.gemini_api_key, &self.openai_api_key) {
            (BackendKind::OpenAi, _, Some(key)) => Some((BackendKind::OpenAi, key)),
            (_, Some(key), _) => Some((BackendKind::Gemini, key)),
            (_, None, Some(key)) => Some((BackendKind::OpenAi, key)),
            (_, None, None) => None,
        }
    }
}

/// Persisted shape with camelCase keys.
#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct StoredSettings {
    gemini_api_key: String,
    openai_api_key: String,
    #[serde(deserialize_with = "lenient_backend")]
    preferred_model: BackendKind,
}

/// Empty, `null` or unrecognised preferences mean the default vendor.
fn lenient_backend<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BackendKind, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|m| m.parse().ok()).unwrap_or_default())
}

impl Serialize for Settings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let expose = |key: &Option<SecretString>| {
            key.as_ref().map(|k| k.expose().to_string()).unwrap_or_default()
        };
        StoredSettings {
            gemini_api_key: expose(&self.gemini_api_key),
            openai_api_key: expose(&self.openai_api_key),
            preferred_model: self.preferred_model,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = StoredSettings::deserialize(deserializer)?;
        Ok(Self {
            gemini_api_key: SecretString::non_empty(stored.gemini_api_key),
            openai_api_key: SecretString::non_empty(stored.openai_api_key),
            preferred_model: stored.preferred_model,
        })
    }
}
