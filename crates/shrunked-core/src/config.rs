use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// How the single notification bar is shared between concurrent negotiations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptSurface {
    /// A new prompt replaces the displayed one; the replaced request is cancelled.
    #[default]
    Replace,
    /// Prompts wait for the bar and are shown one at a time, in arrival order.
    Queue,
}

/// External resize command (optional `[resizer]` section in config.toml).
///
/// `args` may contain the placeholders `{input}`, `{output}`, `{width}`,
/// `{height}` and `{quality}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizerConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Directory for resized copies (None = system temp dir).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for ResizerConfig {
    fn default() -> Self {
        Self {
            program: "convert".to_string(),
            args: [
                "{input}",
                "-auto-orient",
                "-resize",
                "{width}x{height}>",
                "-quality",
                "{quality}",
                "{output}",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            output_dir: None,
        }
    }
}

/// Global configuration loaded from `~/.config/shrunked/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShrunkedConfig {
    /// JPEGs at or below this size (in kB of 1000 bytes) are uploaded untouched.
    pub min_file_size_kb: u64,
    /// JPEG quality handed to the resizer.
    pub default_quality: u8,
    /// When true, answering "Yes" opens the dimension dialog; otherwise the defaults below are used.
    pub ask_dimensions: bool,
    pub default_max_width: u32,
    pub default_max_height: u32,
    #[serde(default)]
    pub prompt_surface: PromptSurface,
    #[serde(default)]
    pub resizer: Option<ResizerConfig>,
}

impl Default for ShrunkedConfig {
    fn default() -> Self {
        Self {
            min_file_size_kb: 100,
            default_quality: 75,
            ask_dimensions: true,
            default_max_width: 500,
            default_max_height: 500,
            prompt_surface: PromptSurface::Replace,
            resizer: None,
        }
    }
}

impl ShrunkedConfig {
    /// Candidate threshold in bytes.
    pub fn min_file_size_bytes(&self) -> u64 {
        self.min_file_size_kb.saturating_mul(1000)
    }

    /// Quality clamped to the JPEG range 1..=100.
    pub fn quality(&self) -> u8 {
        self.default_quality.clamp(1, 100)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("shrunked")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ShrunkedConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ShrunkedConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ShrunkedConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ShrunkedConfig::default();
        assert_eq!(cfg.min_file_size_kb, 100);
        assert_eq!(cfg.min_file_size_bytes(), 100_000);
        assert_eq!(cfg.default_quality, 75);
        assert!(cfg.ask_dimensions);
        assert_eq!(cfg.prompt_surface, PromptSurface::Replace);
        assert!(cfg.resizer.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ShrunkedConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ShrunkedConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.min_file_size_kb, cfg.min_file_size_kb);
        assert_eq!(parsed.default_quality, cfg.default_quality);
        assert_eq!(parsed.default_max_width, cfg.default_max_width);
        assert_eq!(parsed.default_max_height, cfg.default_max_height);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            min_file_size_kb = 1000
            default_quality = 90
            ask_dimensions = false
            default_max_width = 1024
            default_max_height = 768
            prompt_surface = "queue"

            [resizer]
            program = "magick"
            args = ["{input}", "-resize", "{width}x{height}", "{output}"]
            output_dir = "/var/tmp/shrunked"
        "#;
        let cfg: ShrunkedConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.min_file_size_bytes(), 1_000_000);
        assert_eq!(cfg.quality(), 90);
        assert!(!cfg.ask_dimensions);
        assert_eq!(cfg.prompt_surface, PromptSurface::Queue);
        let resizer = cfg.resizer.as_ref().unwrap();
        assert_eq!(resizer.program, "magick");
        assert_eq!(resizer.args.len(), 4);
        assert_eq!(
            resizer.output_dir.as_deref(),
            Some(std::path::Path::new("/var/tmp/shrunked"))
        );
    }

    #[test]
    fn quality_is_clamped() {
        let mut cfg = ShrunkedConfig::default();
        cfg.default_quality = 0;
        assert_eq!(cfg.quality(), 1);
        cfg.default_quality = 250;
        assert_eq!(cfg.quality(), 100);
    }
}
