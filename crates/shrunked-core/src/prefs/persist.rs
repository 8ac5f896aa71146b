//! Site preferences persisted as JSON under the XDG state dir, so choices survive across runs.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::{PrefKey, PrefTable, PrefValue, PreferenceStore};

/// File-backed store. Every change rewrites the whole file.
#[derive(Debug)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    table: Mutex<PrefTable>,
}

impl JsonPreferenceStore {
    /// Default path: `~/.local/state/shrunked/site_prefs.json`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("shrunked")?;
        Ok(xdg_dirs.get_state_home().join("site_prefs.json"))
    }

    /// Open the store at `path`. A missing file reads as an empty table.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let table = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("parse site preferences: {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PrefTable::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("read site preferences: {}", path.display()))
            }
        };
        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    pub async fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, table: &PrefTable) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(table).context("serialize site preferences")?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("write site preferences: {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for JsonPreferenceStore {
    async fn get(&self, host: &str, key: PrefKey) -> Result<Option<PrefValue>> {
        Ok(self.table.lock().await.get(host, key))
    }

    async fn set(&self, host: &str, key: PrefKey, value: PrefValue) -> Result<()> {
        let mut table = self.table.lock().await;
        table.set(host, key, value);
        self.save(&table).await?;
        tracing::debug!(host, key = key.as_str(), %value, "stored site preference");
        Ok(())
    }

    async fn forget(&self, host: &str) -> Result<bool> {
        let mut table = self.table.lock().await;
        if !table.forget(host) {
            return Ok(false);
        }
        self.save(&table).await?;
        Ok(true)
    }

    async fn hosts(&self) -> Result<Vec<String>> {
        Ok(self.table.lock().await.hosts())
    }
}
