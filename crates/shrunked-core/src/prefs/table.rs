//! Serializable host → preferences table shared by the stock stores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{PrefKey, PrefValue};

/// Snapshot of all site preferences. Keys inside a host are the persisted
/// preference names; unknown names are kept but never read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefTable {
    #[serde(default = "default_version")]
    pub version: u8,
    #[serde(default)]
    pub sites: BTreeMap<String, BTreeMap<String, PrefValue>>,
}

fn default_version() -> u8 {
    1
}

impl Default for PrefTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefTable {
    pub fn new() -> Self {
        Self {
            version: default_version(),
            sites: BTreeMap::new(),
        }
    }

    pub fn get(&self, host: &str, key: PrefKey) -> Option<PrefValue> {
        self.sites.get(host)?.get(key.as_str()).copied()
    }

    pub fn set(&mut self, host: &str, key: PrefKey, value: PrefValue) {
        self.sites
            .entry(host.to_string())
            .or_default()
            .insert(key.as_str().to_string(), value);
    }

    pub fn forget(&mut self, host: &str) -> bool {
        self.sites.remove(host).is_some()
    }

    pub fn hosts(&self) -> Vec<String> {
        self.sites.keys().cloned().collect()
    }
}
