//! Per-site preferences: resizing disabled, or a remembered target size.
//!
//! Stored per host under the keys `extensions.shrunked.disabled`,
//! `extensions.shrunked.maxWidth` and `extensions.shrunked.maxHeight`.

mod key;
mod memory;
mod persist;
mod table;

use anyhow::Result;
use async_trait::async_trait;

use crate::protocol::Dimensions;

pub use key::{PrefKey, PrefValue};
pub use memory::MemoryPreferenceStore;
pub use persist::JsonPreferenceStore;
pub use table::PrefTable;

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, host: &str, key: PrefKey) -> Result<Option<PrefValue>>;
    async fn set(&self, host: &str, key: PrefKey, value: PrefValue) -> Result<()>;
    /// Drop every preference for `host`. Returns false if there were none.
    async fn forget(&self, host: &str) -> Result<bool>;
    async fn hosts(&self) -> Result<Vec<String>>;
}

/// Everything stored for one host, read in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitePreference {
    pub host: String,
    pub disabled: bool,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl SitePreference {
    pub async fn load(store: &dyn PreferenceStore, host: &str) -> Result<Self> {
        let disabled = store
            .get(host, PrefKey::Disabled)
            .await?
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let max_width = store
            .get(host, PrefKey::MaxWidth)
            .await?
            .and_then(|v| v.as_u32());
        let max_height = store
            .get(host, PrefKey::MaxHeight)
            .await?
            .and_then(|v| v.as_u32());
        Ok(Self {
            host: host.to_string(),
            disabled,
            max_width,
            max_height,
        })
    }

    /// Remembered size, only when both bounds are stored.
    pub fn dimensions(&self) -> Option<Dimensions> {
        Dimensions::from_parts(self.max_width, self.max_height)
    }
}

/// Persist "never resize on this site".
pub async fn disable_site(store: &dyn PreferenceStore, host: &str) -> Result<()> {
    store.set(host, PrefKey::Disabled, PrefValue::Bool(true)).await
}

/// Persist a remembered size for a site.
pub async fn remember_dimensions(
    store: &dyn PreferenceStore,
    host: &str,
    dimensions: Dimensions,
) -> Result<()> {
    store
        .set(host, PrefKey::MaxWidth, PrefValue::Int(dimensions.max_width.into()))
        .await?;
    store
        .set(host, PrefKey::MaxHeight, PrefValue::Int(dimensions.max_height.into()))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_yields_default_preference() {
        let store = MemoryPreferenceStore::new();
        let pref = SitePreference::load(&store, "example.com").await.unwrap();
        assert!(!pref.disabled);
        assert!(pref.dimensions().is_none());
    }

    #[tokio::test]
    async fn remembered_dimensions_and_disable_are_read_back() {
        let store = MemoryPreferenceStore::new();
        remember_dimensions(&store, "photos.example", Dimensions::new(1280, 960))
            .await
            .unwrap();
        disable_site(&store, "spam.example").await.unwrap();

        let photos = SitePreference::load(&store, "photos.example").await.unwrap();
        assert_eq!(photos.dimensions(), Some(Dimensions::new(1280, 960)));
        assert!(!photos.disabled);

        let spam = SitePreference::load(&store, "spam.example").await.unwrap();
        assert!(spam.disabled);
        assert!(spam.dimensions().is_none());
    }

    #[tokio::test]
    async fn half_remembered_size_does_not_count() {
        let store = MemoryPreferenceStore::new();
        store
            .set("a.example", PrefKey::MaxWidth, PrefValue::Int(800))
            .await
            .unwrap();
        let pref = SitePreference::load(&store, "a.example").await.unwrap();
        assert_eq!(pref.max_width, Some(800));
        assert!(pref.dimensions().is_none());
    }
}
