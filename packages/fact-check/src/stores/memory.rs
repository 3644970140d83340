//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::traits::store::{HistoryStore, SettingsStore};
use crate::types::{
    config::FactCheckConfig,
    history::{HistoryEntry, HISTORY_CAPACITY},
    settings::Settings,
};

/// In-memory history and settings.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
pub struct MemoryStore {
    history: RwLock<VecDeque<HistoryEntry>>,
    settings: RwLock<Option<Settings>>,
    capacity: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store holding up to 50 history entries.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: RwLock::new(VecDeque::with_capacity(capacity)),
            settings: RwLock::new(None),
            capacity,
        }
    }

    /// Capacity from `history_capacity`.
    pub fn from_config(config: &FactCheckConfig) -> Self {
        Self::with_capacity(config.history_capacity)
    }

    /// Seed stored settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        *self.settings.get_mut() = Some(settings);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of history entries.
    pub async fn history_len(&self) -> usize {
        self.history.read().await.len()
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut history = self.history.write().await;
        history.push_front(entry);
        history.truncate(self.capacity);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.history.read().await.iter().cloned().collect())
    }

    async fn clear(&self) -> Result<()> {
        self.history.write().await.clear();
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load(&self) -> Result<Settings> {
        Ok(self.settings.read().await.clone().unwrap_or_default())
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        *self.settings.write().await = Some(settings.clone());
        Ok(())
    }
}
