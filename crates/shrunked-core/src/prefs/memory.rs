use std::sync::{Mutex, PoisonError};

use anyhow::Result;
use async_trait::async_trait;

use super::{PrefKey, PrefTable, PrefValue, PreferenceStore};

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    table: Mutex<PrefTable>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PrefTable {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, host: &str, key: PrefKey) -> Result<Option<PrefValue>> {
        Ok(self
            .table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(host, key))
    }

    async fn set(&self, host: &str, key: PrefKey, value: PrefValue) -> Result<()> {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set(host, key, value);
        Ok(())
    }

    async fn forget(&self, host: &str) -> Result<bool> {
        Ok(self
            .table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .forget(host))
    }

    async fn hosts(&self) -> Result<Vec<String>> {
        Ok(self
            .table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .hosts())
    }
}
