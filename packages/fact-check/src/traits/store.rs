//! Storage traits for history and settings.
//!
//! History and settings live in separate namespaces: settings are long-lived
//! and may be synced, history is local-only.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{history::HistoryEntry, settings::Settings};

/// Bounded, most-recent-first log of past checks.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Insert at the head, evicting the oldest entries beyond capacity.
    ///
    /// No deduplication: identical entries are kept twice.
    async fn append(&self, entry: HistoryEntry) -> Result<()>;

    /// Entries, most recent first. Empty is not an error.
    async fn list(&self) -> Result<Vec<HistoryEntry>>;

    /// Remove every entry. After this returns, `list` is empty.
    async fn clear(&self) -> Result<()>;
}

/// Credential and preference storage.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Stored settings, or defaults if none were saved.
    async fn load(&self) -> Result<Settings>;

    async fn save(&self, settings: &Settings) -> Result<()>;
}
