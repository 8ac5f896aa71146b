//! User interaction needed during size negotiation.
//!
//! A `Prompter` draws two things: the notification bar asking whether to
//! resize at all, and the modal dialog where the user picks a size.

mod bar;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::protocol::Dimensions;

pub use bar::NotificationBar;

/// Buttons on the notification bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAnswer {
    /// Resize this time.
    Yes,
    /// Never resize on this site (persisted).
    Never,
    /// Not this time.
    No,
}

/// What the notification bar shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub file_count: usize,
    pub choices: Vec<PromptAnswer>,
}

impl Question {
    /// `offer_never` is false for origins that may not persist anything.
    pub fn for_files(file_count: usize, offer_never: bool) -> Self {
        let text = if file_count == 1 {
            "This page is about to upload an image. Do you want to resize it?".to_string()
        } else {
            format!("This page is about to upload {file_count} images. Do you want to resize them?")
        };
        let mut choices = vec![PromptAnswer::Yes];
        if offer_never {
            choices.push(PromptAnswer::Never);
        }
        choices.push(PromptAnswer::No);
        Self {
            text,
            file_count,
            choices,
        }
    }

    pub fn offers(&self, answer: PromptAnswer) -> bool {
        self.choices.contains(&answer)
    }
}

/// Input to the modal size dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionsRequest {
    pub images: Vec<PathBuf>,
    pub suggested: Dimensions,
    /// Whether the "remember for this site" option may be shown.
    pub can_remember: bool,
}

/// The dialog's result when the user confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionsChoice {
    pub dimensions: Dimensions,
    pub remember_site: bool,
}

#[async_trait]
pub trait Prompter: Send + Sync {
    /// Show the notification bar and wait for a button.
    async fn ask(&self, question: &Question) -> PromptAnswer;

    /// Show the size dialog. `None` when the user cancels it.
    async fn choose_dimensions(&self, request: &DimensionsRequest) -> Option<DimensionsChoice>;
}
