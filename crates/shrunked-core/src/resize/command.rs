//! Resize by running an external image tool (ImageMagick by default).

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;

use crate::config::ResizerConfig;
use crate::protocol::Dimensions;

use super::{FileResizer, ResizeError};

pub struct CommandResizer {
    config: ResizerConfig,
}

impl CommandResizer {
    pub fn new(config: ResizerConfig) -> Self {
        Self { config }
    }

    fn output_dir(&self) -> PathBuf {
        self.config
            .output_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Fresh output path that keeps the source's stem and extension.
    async fn reserve_output(&self, file: &Path) -> Result<PathBuf, ResizeError> {
        let dir = self.output_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(ResizeError::Output)?;
        let stem = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let prefix = format!("{stem}-");
        let suffix = format!(".{}", file.extension().and_then(|s| s.to_str()).unwrap_or("jpg"));

        // tempfile creates and opens the file synchronously.
        tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(&prefix)
                .suffix(&suffix)
                .tempfile_in(&dir)?
                .into_temp_path()
                .keep()
                .map_err(|e| e.error)
        })
        .await
        .map_err(|e| ResizeError::Output(std::io::Error::new(std::io::ErrorKind::Other, e)))?
        .map_err(ResizeError::Output)
    }

    fn expand_args(&self, input: &Path, output: &Path, bounds: Dimensions, quality: u8) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.config
            .args
            .iter()
            .map(|arg| {
                arg.replace("{input}", &input)
                    .replace("{output}", &output)
                    .replace("{width}", &bounds.max_width.to_string())
                    .replace("{height}", &bounds.max_height.to_string())
                    .replace("{quality}", &quality.to_string())
            })
            .collect()
    }
}

#[async_trait]
impl FileResizer for CommandResizer {
    async fn resize(
        &self,
        file: &Path,
        bounds: Dimensions,
        quality: u8,
    ) -> Result<PathBuf, ResizeError> {
        let output = self.reserve_output(file).await?;
        let args = self.expand_args(file, &output, bounds, quality);
        tracing::debug!(program = %self.config.program, ?args, "running resizer");

        let result = tokio::process::Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let out = match result {
            Ok(out) => out,
            Err(source) => {
                let _ = tokio::fs::remove_file(&output).await;
                return Err(ResizeError::Spawn {
                    program: self.config.program.clone(),
                    source,
                });
            }
        };
        if !out.status.success() {
            let _ = tokio::fs::remove_file(&output).await;
            return Err(ResizeError::Failed {
                program: self.config.program.clone(),
                status: out.status,
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}
