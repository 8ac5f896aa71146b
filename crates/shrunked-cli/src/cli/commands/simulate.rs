//! `shrunked simulate` – run one file selection through the whole pipeline.
//!
//! A page with a single file input is simulated in-process: the change is
//! intercepted, the orchestrator negotiates on the terminal and resizes, and the
//! input's file list after substitution is printed.

use anyhow::{bail, Context, Result};
use shrunked_core::bridge;
use shrunked_core::config::ShrunkedConfig;
use shrunked_core::content::ContentInterceptor;
use shrunked_core::dom::{ChangeTarget, FileInput, MemoryFileInput, MemoryForm};
use shrunked_core::protocol::{BrowsingContext, Dimensions};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

use super::build_orchestrator;

pub async fn run_simulate(
    cfg: &ShrunkedConfig,
    url: &str,
    private: bool,
    form: Option<&str>,
    files: Vec<PathBuf>,
) -> Result<()> {
    let uri = Url::parse(url).with_context(|| format!("invalid page URL: {url}"))?;
    let context = BrowsingContext::new(uri, private);

    let input: Arc<MemoryFileInput> = match form {
        Some(size) => {
            let dimensions = parse_dimensions(size)?;
            MemoryFileInput::in_form(files, MemoryForm::with_cache(dimensions.into()))
        }
        None => MemoryFileInput::new(files),
    };

    let orchestrator = build_orchestrator(cfg).await?;
    let (endpoint, mut inbox) = bridge::channel();
    let (port, mut replies) = endpoint.connect(context);
    let mut interceptor = ContentInterceptor::new(port);

    let target = ChangeTarget::FileInput(Arc::clone(&input) as Arc<dyn FileInput>);
    if interceptor.on_change(&target).is_some() {
        // Only one request is in flight, so handle it inline instead of running `serve`.
        if let Some(inbound) = inbox.recv().await {
            match orchestrator.handle(&inbound.context, inbound.message).await? {
                Some(resized) => {
                    inbound.reply.send(resized)?;
                    if let Some(resized) = replies.recv().await {
                        interceptor.on_resized(resized);
                    }
                }
                None => println!("Upload left unchanged."),
            }
        }
    }

    for file in input.file_names() {
        println!("{}", file.display());
    }
    Ok(())
}

/// Parse `WxH` (e.g. `800x600`); both sides must be positive.
pub(crate) fn parse_dimensions(s: &str) -> Result<Dimensions> {
    let Some((w, h)) = s.trim().split_once(['x', 'X']) else {
        bail!("expected WIDTHxHEIGHT, got {s:?}");
    };
    let width: u32 = w.trim().parse().with_context(|| format!("invalid width in {s:?}"))?;
    let height: u32 = h.trim().parse().with_context(|| format!("invalid height in {s:?}"))?;
    if width == 0 || height == 0 {
        bail!("dimensions must be non-zero, got {s:?}");
    }
    Ok(Dimensions::new(width, height))
}
