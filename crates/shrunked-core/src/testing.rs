//! Scripted collaborators for deterministic tests.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};

use crate::prompt::{DimensionsChoice, DimensionsRequest, PromptAnswer, Prompter, Question};
use crate::protocol::Dimensions;
use crate::resize::{FileResizer, ResizeError};

/// Holds a scripted answer back until opened (or dropped).
pub(crate) struct Gate(oneshot::Sender<()>);

impl Gate {
    pub(crate) fn open(self) {
        let _ = self.0.send(());
    }
}

struct Scripted {
    answer: PromptAnswer,
    gate: Option<oneshot::Receiver<()>>,
}

/// Prompter that replays queued answers. An empty script answers `No` and
/// cancels the dialog.
pub(crate) struct ScriptedPrompter {
    answers: Mutex<VecDeque<Scripted>>,
    dialogs: Mutex<VecDeque<Option<DimensionsChoice>>>,
    questions: Mutex<Vec<Question>>,
    dialog_requests: Mutex<Vec<DimensionsRequest>>,
    asked: watch::Sender<usize>,
}

impl ScriptedPrompter {
    pub(crate) fn new() -> Self {
        Self {
            answers: Mutex::default(),
            dialogs: Mutex::default(),
            questions: Mutex::default(),
            dialog_requests: Mutex::default(),
            asked: watch::channel(0).0,
        }
    }

    pub(crate) fn push_answer(&self, answer: PromptAnswer) {
        lock(&self.answers).push_back(Scripted { answer, gate: None });
    }

    pub(crate) fn push_gated_answer(&self, answer: PromptAnswer) -> Gate {
        let (tx, rx) = oneshot::channel();
        lock(&self.answers).push_back(Scripted {
            answer,
            gate: Some(rx),
        });
        Gate(tx)
    }

    pub(crate) fn push_dialog(&self, choice: Option<DimensionsChoice>) {
        lock(&self.dialogs).push_back(choice);
    }

    pub(crate) fn questions(&self) -> Vec<Question> {
        lock(&self.questions).clone()
    }

    pub(crate) fn dialog_requests(&self) -> Vec<DimensionsRequest> {
        lock(&self.dialog_requests).clone()
    }

    /// Wait until at least `n` questions have been shown.
    pub(crate) async fn wait_for_questions(&self, n: usize) {
        let mut rx = self.asked.subscribe();
        let _ = rx.wait_for(|count| *count >= n).await;
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn ask(&self, question: &Question) -> PromptAnswer {
        let next = lock(&self.answers).pop_front();
        lock(&self.questions).push(question.clone());
        self.asked.send_modify(|count| *count += 1);
        let Some(Scripted { answer, gate }) = next else {
            return PromptAnswer::No;
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        answer
    }

    async fn choose_dimensions(&self, request: &DimensionsRequest) -> Option<DimensionsChoice> {
        lock(&self.dialog_requests).push(request.clone());
        lock(&self.dialogs).pop_front().flatten()
    }
}

/// Resizer that "writes" `resized_<name>` next to the source and records calls.
#[derive(Default)]
pub(crate) struct ScriptedResizer {
    failing: Mutex<HashSet<PathBuf>>,
    calls: Mutex<Vec<(PathBuf, Dimensions, u8)>>,
}

impl ScriptedResizer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_on(&self, file: impl Into<PathBuf>) {
        lock(&self.failing).insert(file.into());
    }

    pub(crate) fn calls(&self) -> Vec<(PathBuf, Dimensions, u8)> {
        lock(&self.calls).clone()
    }

    pub(crate) fn resized_name(file: &Path) -> PathBuf {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        file.with_file_name(format!("resized_{name}"))
    }
}

#[async_trait]
impl FileResizer for ScriptedResizer {
    async fn resize(
        &self,
        file: &Path,
        bounds: Dimensions,
        quality: u8,
    ) -> Result<PathBuf, ResizeError> {
        lock(&self.calls).push((file.to_path_buf(), bounds, quality));
        if lock(&self.failing).contains(file) {
            return Err(ResizeError::Output(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("scripted failure for {}", file.display()),
            )));
        }
        Ok(Self::resized_name(file))
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
