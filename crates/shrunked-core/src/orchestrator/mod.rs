//! Chrome side: drives each request from receipt to result.
//!
//! Per request: `Received → Negotiating → {Cancelled | Resizing} → Completed`.
//! A direct resize skips negotiation. `Cancelled` is terminal and sends
//! nothing back. Requests run as independent tasks; nothing orders them.

mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::ShrunkedConfig;
use crate::negotiate::{AbortReason, Negotiation, SizeNegotiator};
use crate::prefs::PreferenceStore;
use crate::prompt::Prompter;
use crate::protocol::{BrowsingContext, ContentMessage, Dimensions, ReplacementMap, Resized};
use crate::resize::{CandidateFilter, FileResizer};

pub use serve::ServeStats;

/// Where a request is in its workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Received,
    Negotiating,
    Resizing(Dimensions),
    Cancelled(AbortReason),
    Completed(Resized),
}

impl RequestState {
    pub fn name(&self) -> &'static str {
        match self {
            RequestState::Received => "received",
            RequestState::Negotiating => "negotiating",
            RequestState::Resizing(_) => "resizing",
            RequestState::Cancelled(_) => "cancelled",
            RequestState::Completed(_) => "completed",
        }
    }
}

pub struct Orchestrator {
    negotiator: SizeNegotiator,
    resizer: Arc<dyn FileResizer>,
    filter: CandidateFilter,
    quality: u8,
}

impl Orchestrator {
    pub fn new(
        config: &ShrunkedConfig,
        prefs: Arc<dyn PreferenceStore>,
        prompter: Arc<dyn Prompter>,
        resizer: Arc<dyn FileResizer>,
    ) -> Self {
        Self {
            negotiator: SizeNegotiator::new(prefs, prompter, config),
            resizer,
            filter: CandidateFilter::new(config.min_file_size_bytes()),
            quality: config.quality(),
        }
    }

    /// Run one request to its end. `Ok(None)` means it was cancelled and no
    /// result must be sent.
    pub async fn handle(&self, context: &BrowsingContext, message: ContentMessage) -> Result<Option<Resized>> {
        let index = message.index();
        let mut state = RequestState::Received;
        loop {
            let next = match state {
                RequestState::Received => match message.dimensions() {
                    Some(dimensions) => RequestState::Resizing(dimensions),
                    None => RequestState::Negotiating,
                },
                RequestState::Negotiating => {
                    match self.negotiator.negotiate(context, message.files()).await? {
                        Negotiation::Resolved(dimensions) => RequestState::Resizing(dimensions),
                        Negotiation::Aborted(reason) => RequestState::Cancelled(reason),
                    }
                }
                RequestState::Resizing(dimensions) => {
                    let replacements = self.resize_candidates(index, message.files(), dimensions).await;
                    RequestState::Completed(Resized {
                        index,
                        replacements,
                        max_width: dimensions.max_width,
                        max_height: dimensions.max_height,
                    })
                }
                RequestState::Cancelled(reason) => {
                    tracing::info!(index, ?reason, "request cancelled; no result sent");
                    return Ok(None);
                }
                RequestState::Completed(resized) => {
                    tracing::info!(index, replaced = resized.replacements.len(), "request completed");
                    return Ok(Some(resized));
                }
            };
            tracing::debug!(index, state = next.name(), "request state");
            state = next;
        }
    }

    /// Resize every qualifying file; anything that doesn't qualify or fails is left out.
    async fn resize_candidates(&self, index: u64, files: &[PathBuf], dimensions: Dimensions) -> ReplacementMap {
        let mut replacements = ReplacementMap::new();
        for file in files {
            if replacements.contains(file) {
                continue;
            }
            if !self.filter.qualifies(file).await {
                tracing::debug!(index, file = %file.display(), "not a resize candidate");
                continue;
            }
            match self.resizer.resize(file, dimensions, self.quality).await {
                Ok(resized) => {
                    tracing::debug!(index, file = %file.display(), to = %resized.display(), "resized");
                    replacements.insert(file.clone(), resized);
                }
                Err(e) => {
                    tracing::warn!(index, file = %file.display(), "resize failed, uploading original: {}", e);
                }
            }
        }
        replacements
    }
}
