//! Claims and their verification status.

use serde::{Deserialize, Serialize};

/// Verification status of a single claim.
///
/// `Unknown` means verification has not completed (not yet run, or it
/// errored). `NotFactual` is a terminal classification, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Verified,
    Debunked,
    PartiallyTrue,
    Misleading,
    Unverifiable,
    NotFactual,
    #[default]
    Unknown,
}

/// How a status should be presented: as a verdict, as "nothing to check",
/// or as a failed/incomplete check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Verdict,
    NoClaim,
    Incomplete,
}

impl ClaimStatus {
    /// Lenient parse of a backend status label.
    ///
    /// Accepts the canonical names plus the TRUE/FALSE vocabulary the
    /// backends tend to answer with. Anything else is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_uppercase() })
            .collect();

        match normalized.as_str() {
            "VERIFIED" | "TRUE" | "ACCURATE" => Self::Verified,
            "DEBUNKED" | "FALSE" | "INACCURATE" => Self::Debunked,
            "PARTIALLY_TRUE" | "PARTLY_TRUE" | "MIXED" => Self::PartiallyTrue,
            "MISLEADING" => Self::Misleading,
            "UNVERIFIABLE" | "UNVERIFIED" => Self::Unverifiable,
            "NOT_FACTUAL" | "NOT_VERIFIABLE" | "NO_CLAIM" | "OPINION" => Self::NotFactual,
            _ => Self::Unknown,
        }
    }

    /// Canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "VERIFIED",
            Self::Debunked => "DEBUNKED",
            Self::PartiallyTrue => "PARTIALLY_TRUE",
            Self::Misleading => "MISLEADING",
            Self::Unverifiable => "UNVERIFIABLE",
            Self::NotFactual => "NOT_FACTUAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Verified => "Verified",
            Self::Debunked => "Debunked",
            Self::PartiallyTrue => "Partially true",
            Self::Misleading => "Misleading",
            Self::Unverifiable => "Unverifiable",
            Self::NotFactual => "No fact-checking needed",
            Self::Unknown => "Could not check",
        }
    }

    pub fn kind(&self) -> StatusKind {
        match self {
            Self::NotFactual => StatusKind::NoClaim,
            Self::Unknown => StatusKind::Incomplete,
            _ => StatusKind::Verdict,
        }
    }

    /// Score used when the backend gives no structured confidence.
    pub fn baseline_score(&self) -> f64 {
        match self {
            Self::Verified => 0.9,
            Self::PartiallyTrue => 0.6,
            Self::Unverifiable => 0.5,
            Self::Misleading => 0.4,
            Self::Debunked => 0.2,
            Self::NotFactual | Self::Unknown => 0.0,
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source cited for a verdict, in relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub domain: String,
    pub url: String,
}

impl Source {
    pub fn new(
        name: impl Into<String>,
        domain: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            url: url.into(),
        }
    }

    /// Build a source from a URL, deriving the domain and, when no name is
    /// given, using the domain as the name.
    pub fn from_url(url: &str, name: Option<&str>) -> Option<Self> {
        let parsed = url::Url::parse(url.trim()).ok()?;
        let host = parsed.host_str()?;
        let domain = host.strip_prefix("www.").unwrap_or(host).to_string();
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| domain.clone());
        Some(Self {
            name,
            domain,
            url: parsed.to_string(),
        })
    }
}

/// A single factual assertion extracted from source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// The claim as extracted
    pub text: String,

    /// Seconds into the source media, for time-addressable sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,

    pub status: ClaimStatus,

    /// Explanation or correction from the verifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,

    #[serde(default)]
    pub sources: Vec<Source>,
}

impl Claim {
    /// A claim awaiting verification.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: None,
            status: ClaimStatus::Unknown,
            correction: None,
            sources: Vec::new(),
        }
    }

    pub fn with_timestamp(mut self, seconds: f64) -> Self {
        self.timestamp = Some(seconds);
        self
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_correction(mut self, correction: impl Into<String>) -> Self {
        self.correction = Some(correction.into());
        self
    }

    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }

    /// Whether verification has produced a classification.
    pub fn is_checked(&self) -> bool {
        self.status != ClaimStatus::Unknown
    }

    /// `mm:ss` rendering of the timestamp, if any.
    pub fn timestamp_label(&self) -> Option<String> {
        self.timestamp.map(|t| {
            let total = t.max(0.0).floor() as u64;
            format!("{}:{:02}", total / 60, total % 60)
        })
    }
}
