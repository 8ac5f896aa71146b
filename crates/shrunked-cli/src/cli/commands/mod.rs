//! CLI command handlers, one file per command.

mod completions;
mod prefs;
mod serve;
mod simulate;

pub use completions::run_completions;
pub use prefs::run_prefs;
pub use serve::run_serve;
pub use simulate::run_simulate;

#[cfg(test)]
pub(crate) use simulate::parse_dimensions;

use std::sync::Arc;

use anyhow::Result;
use shrunked_core::config::ShrunkedConfig;
use shrunked_core::orchestrator::Orchestrator;
use shrunked_core::prefs::JsonPreferenceStore;
use shrunked_core::resize::CommandResizer;

use super::terminal::TerminalPrompter;

/// Orchestrator wired to the persisted site preferences, the terminal and the configured resizer.
async fn build_orchestrator(cfg: &ShrunkedConfig) -> Result<Orchestrator> {
    let prefs = JsonPreferenceStore::open_default().await?;
    tracing::debug!(path = %prefs.path().display(), "site preferences opened");
    let resizer = CommandResizer::new(cfg.resizer.clone().unwrap_or_default());
    Ok(Orchestrator::new(
        cfg,
        Arc::new(prefs),
        Arc::new(TerminalPrompter::new()),
        Arc::new(resizer),
    ))
}
