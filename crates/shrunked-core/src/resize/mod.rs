//! Picking candidate files and handing them to a resizer.

mod command;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::protocol::Dimensions;

pub use command::CommandResizer;

/// Why a single file could not be resized. The file is then uploaded as is.
#[derive(Debug, thiserror::Error)]
pub enum ResizeError {
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("output file: {0}")]
    Output(#[source] std::io::Error),
}

/// Produces a resized copy of an image that fits inside `bounds`.
#[async_trait]
pub trait FileResizer: Send + Sync {
    async fn resize(
        &self,
        file: &Path,
        bounds: Dimensions,
        quality: u8,
    ) -> Result<PathBuf, ResizeError>;
}

/// `.jpg` / `.jpeg`, any case.
pub fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
}

/// Decides which files of a request are worth resizing.
#[derive(Debug, Clone, Copy)]
pub struct CandidateFilter {
    min_size_bytes: u64,
}

impl CandidateFilter {
    pub fn new(min_size_bytes: u64) -> Self {
        Self { min_size_bytes }
    }

    /// A JPEG strictly larger than the threshold. Unreadable files never qualify.
    pub async fn qualifies(&self, path: &Path) -> bool {
        if !is_jpeg(path) {
            return false;
        }
        match tokio::fs::metadata(path).await {
            Ok(meta) => meta.is_file() && meta.len() > self.min_size_bytes,
            Err(e) => {
                tracing::debug!(file = %path.display(), "cannot stat candidate: {}", e);
                false
            }
        }
    }
}
