use std::path::PathBuf;
use std::sync::Arc;

use crate::bridge::ContentPort;
use crate::dom::{ChangeTarget, FormElement};
use crate::protocol::{ContentMessage, Dimensions, RequestIndex, Resized};

use super::registry::RequestRegistry;
use super::substitute::substitute;

/// How the chrome side should obtain the target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// The form already carries a negotiated size.
    DirectResize(Dimensions),
    /// Size unknown; the chrome side must negotiate it.
    PromptAndResize,
}

/// One qualifying file selection, captured at change time.
pub struct FileSelectionRequest {
    pub index: RequestIndex,
    pub files: Vec<PathBuf>,
    pub form: Option<Arc<dyn FormElement>>,
    pub mode: SelectionMode,
}

impl SelectionMode {
    /// Direct resize when `form` carries both cached bounds, otherwise negotiate.
    pub fn for_form(form: Option<&dyn FormElement>) -> Self {
        form.and_then(|f| f.size_cache().dimensions())
            .map_or(SelectionMode::PromptAndResize, SelectionMode::DirectResize)
    }
}

impl FileSelectionRequest {
    pub fn to_message(&self) -> ContentMessage {
        match self.mode {
            SelectionMode::DirectResize(d) => ContentMessage::Resize {
                index: self.index,
                files: self.files.clone(),
                max_width: d.max_width,
                max_height: d.max_height,
            },
            SelectionMode::PromptAndResize => ContentMessage::PromptAndResize {
                index: self.index,
                files: self.files.clone(),
            },
        }
    }
}

/// Content-side half of the protocol, owned by one page.
pub struct ContentInterceptor {
    registry: RequestRegistry,
    port: ContentPort,
}

impl ContentInterceptor {
    pub fn new(port: ContentPort) -> Self {
        Self {
            registry: RequestRegistry::new(),
            port,
        }
    }

    pub fn registry(&self) -> &RequestRegistry {
        &self.registry
    }

    /// Handle a `change` event. Returns the request that was sent, if the
    /// event qualified. Nothing on the page changes until its result arrives.
    pub fn on_change(&mut self, target: &ChangeTarget) -> Option<FileSelectionRequest> {
        let ChangeTarget::FileInput(input) = target else {
            return None;
        };
        let files = input.file_names();
        if files.is_empty() {
            return None;
        }
        let form = input.form();
        let mode = SelectionMode::for_form(form.as_deref());
        let index = self.registry.register(input);
        let request = FileSelectionRequest {
            index,
            files,
            form,
            mode,
        };

        if let Err(e) = self.port.send(request.to_message()) {
            tracing::warn!(index, "could not send resize request: {:#}", e);
            self.registry.take(index);
            return None;
        }
        tracing::debug!(index, files = request.files.len(), mode = ?request.mode, "sent resize request");
        Some(request)
    }

    /// Apply a result. Returns false when no live input is waiting for it
    /// (unknown index, or the element was detached).
    pub fn on_resized(&mut self, resized: Resized) -> bool {
        let Some(input) = self.registry.take(resized.index) else {
            tracing::debug!(index = resized.index, "result for unknown or detached input ignored");
            return false;
        };
        substitute(input.as_ref(), &resized);
        true
    }

    /// Forget pending requests whose input element is gone.
    pub fn prune_detached(&mut self) -> usize {
        let pruned = self.registry.prune_detached();
        if pruned > 0 {
            tracing::debug!(pruned, "pruned requests for detached inputs");
        }
        pruned
    }
}
