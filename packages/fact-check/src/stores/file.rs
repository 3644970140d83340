//! JSON-file key-value storage.
//!
//! Two files under one directory keep the namespaces apart:
//! `settings.json` holds `{geminiApiKey, openaiApiKey, preferredModel}` and
//! `history.json` holds `{"history": [...]}`. Writes go to a temp file that
//! is renamed over the target. Read-modify-write cycles are serialized
//! within the process only.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::traits::store::{HistoryStore, SettingsStore};
use crate::types::{
    config::FactCheckConfig,
    history::{HistoryEntry, HISTORY_CAPACITY},
    settings::Settings,
};

const SETTINGS_FILE: &str = "settings.json";
const HISTORY_FILE: &str = "history.json";

#[derive(Default, Serialize, Deserialize)]
struct HistoryDocument {
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

/// File-backed history and settings.
pub struct JsonFileStore {
    dir: PathBuf,
    capacity: usize,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            capacity: HISTORY_CAPACITY,
            lock: Mutex::new(()),
        })
    }

    /// Open with the history capacity from `config`.
    pub async fn open_with_config(dir: impl Into<PathBuf>, config: &FactCheckConfig) -> Result<Self> {
        Ok(Self::open(dir).await?.with_capacity(config.history_capacity))
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!("{}.tmp", name));
        let bytes = serde_json::to_vec_pretty(value)?;

        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote store file");
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for JsonFileStore {
    async fn append(&self, entry: HistoryEntry) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut doc: HistoryDocument = self.read(HISTORY_FILE).await?;
        doc.history.insert(0, entry);
        doc.history.truncate(self.capacity);
        self.write(HISTORY_FILE, &doc).await
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>> {
        let _guard = self.lock.lock().await;
        let doc: HistoryDocument = self.read(HISTORY_FILE).await?;
        Ok(doc.history)
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.write(HISTORY_FILE, &HistoryDocument::default()).await
    }
}

#[async_trait]
impl SettingsStore for JsonFileStore {
    async fn load(&self) -> Result<Settings> {
        let _guard = self.lock.lock().await;
        self.read(SETTINGS_FILE).await
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.write(SETTINGS_FILE, settings).await
    }
}
