//! CLI for the Shrunked upload resizer.

mod commands;
mod socket;
mod terminal;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use shrunked_core::config;
use std::path::PathBuf;

use commands::{run_completions, run_prefs, run_serve, run_simulate};

/// Top-level CLI for Shrunked.
#[derive(Debug, Parser)]
#[command(name = "shrunked")]
#[command(about = "Shrunked: resize oversized JPEG uploads before they are sent", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Select files on a simulated page and show what would be uploaded.
    Simulate {
        /// URL of the page the upload form lives on.
        #[arg(long, default_value = "https://localhost/")]
        url: String,
        /// Treat the page as a private-browsing window (nothing is remembered).
        #[arg(long)]
        private: bool,
        /// Size already remembered on the form, e.g. 800x600 (skips the prompt).
        #[arg(long, value_name = "WxH")]
        form: Option<String>,
        /// Files selected in the input, in order.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Serve resize requests as JSON lines on a Unix socket.
    Serve {
        /// Socket path (default: state dir).
        #[arg(long)]
        socket: Option<PathBuf>,
    },

    /// Inspect or reset remembered site preferences.
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },

    /// Print a shell completion script.
    Completions {
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum PrefsAction {
    /// List every site with stored preferences.
    List,
    /// Show the preferences stored for one site.
    Show { host: String },
    /// Forget everything stored for a site.
    Forget { host: String },
    /// Re-enable resizing on a site previously set to "never".
    Enable { host: String },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Simulate {
                url,
                private,
                form,
                files,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_simulate(&cfg, &url, private, form.as_deref(), files).await?;
            }
            CliCommand::Serve { socket } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_serve(&cfg, socket).await?;
            }
            CliCommand::Prefs { action } => run_prefs(action).await?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
