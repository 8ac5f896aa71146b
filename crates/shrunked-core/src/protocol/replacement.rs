//! Original file → resized file mapping for one request.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Mapping from an original file to its resized counterpart.
///
/// Keys are always a subset of the file list of the request that produced the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplacementMap(HashMap<PathBuf, PathBuf>);

impl ReplacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, original: PathBuf, resized: PathBuf) {
        self.0.insert(original, resized);
    }

    pub fn get(&self, original: &Path) -> Option<&Path> {
        self.0.get(original).map(PathBuf::as_path)
    }

    pub fn contains(&self, original: &Path) -> bool {
        self.0.contains_key(original)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.0.iter().map(|(k, v)| (k.as_path(), v.as_path()))
    }

    /// New list with every replaced entry swapped for its resized copy.
    /// Order is preserved and unreplaced entries are left as they are.
    pub fn apply(&self, files: &[PathBuf]) -> Vec<PathBuf> {
        files
            .iter()
            .map(|f| self.0.get(f).unwrap_or(f).clone())
            .collect()
    }
}

impl FromIterator<(PathBuf, PathBuf)> for ReplacementMap {
    fn from_iter<I: IntoIterator<Item = (PathBuf, PathBuf)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
