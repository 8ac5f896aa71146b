//! The single notification bar shared by every negotiation in a window.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;

use crate::config::PromptSurface;

use super::{PromptAnswer, Prompter, Question};

/// Serializes or replaces prompts on the one visible bar.
///
/// In `Replace` mode a new question dismisses the one on screen and the
/// dismissed caller gets `None` back. In `Queue` mode callers wait their
/// turn and every question is eventually answered.
pub struct NotificationBar {
    prompter: Arc<dyn Prompter>,
    surface: PromptSurface,
    shown: Mutex<Option<(u64, oneshot::Sender<()>)>>,
    next_id: AtomicU64,
    turn: tokio::sync::Mutex<()>,
}

impl NotificationBar {
    pub fn new(prompter: Arc<dyn Prompter>, surface: PromptSurface) -> Self {
        Self {
            prompter,
            surface,
            shown: Mutex::new(None),
            next_id: AtomicU64::new(1),
            turn: tokio::sync::Mutex::new(()),
        }
    }

    pub fn prompter(&self) -> &Arc<dyn Prompter> {
        &self.prompter
    }

    /// Show `question`. `None` means it was dismissed by a newer question.
    pub async fn ask(&self, question: &Question) -> Option<PromptAnswer> {
        match self.surface {
            PromptSurface::Queue => {
                let _turn = self.turn.lock().await;
                Some(self.prompter.ask(question).await)
            }
            PromptSurface::Replace => self.ask_replacing(question).await,
        }
    }

    async fn ask_replacing(&self, question: &Question) -> Option<PromptAnswer> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (dismiss_tx, dismiss_rx) = oneshot::channel();
        let replaced = self
            .shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace((id, dismiss_tx));
        if let Some((old_id, old)) = replaced {
            tracing::debug!(prompt = old_id, by = id, "notification replaced");
            let _ = old.send(());
        }

        let answer = tokio::select! {
            answer = self.prompter.ask(question) => Some(answer),
            _ = dismiss_rx => None,
        };

        let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(shown.as_ref(), Some((current, _)) if *current == id) {
            *shown = None;
        }
        answer
    }
}
