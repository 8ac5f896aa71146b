//! Tests for the terminal prompter reading from a scripted input stream.

use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::terminal::TerminalPrompter;
use shrunked_core::prompt::{DimensionsChoice, DimensionsRequest, PromptAnswer, Prompter, Question};
use shrunked_core::protocol::Dimensions;
use tokio::io::{AsyncWriteExt, BufReader};

fn request(can_remember: bool) -> DimensionsRequest {
    DimensionsRequest {
        images: vec![PathBuf::from("a.jpg")],
        suggested: Dimensions::new(500, 500),
        can_remember,
    }
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn dialog_reads_width_height_and_remember() {
    let (mut keys, screen) = tokio::io::duplex(64);
    let prompter = TerminalPrompter::with_reader(BufReader::new(screen));
    keys.write_all(b"1024\n\ny\n").await.unwrap();

    let choice = prompter.choose_dimensions(&request(true)).await;
    assert_eq!(
        choice,
        Some(DimensionsChoice {
            dimensions: Dimensions::new(1024, 500),
            remember_site: true,
        })
    );
}

#[tokio::test]
async fn dialog_is_not_interleaved_with_another_question() {
    let (mut keys, screen) = tokio::io::duplex(64);
    let prompter = Arc::new(TerminalPrompter::with_reader(BufReader::new(screen)));

    let dialog = tokio::spawn({
        let prompter = Arc::clone(&prompter);
        async move { prompter.choose_dimensions(&request(false)).await }
    });
    settle().await;
    let question = tokio::spawn({
        let prompter = Arc::clone(&prompter);
        async move { prompter.ask(&Question::for_files(1, true)).await }
    });
    settle().await;

    // The width arrives while the other question is waiting for the terminal.
    keys.write_all(b"800\n").await.unwrap();
    settle().await;
    keys.write_all(b"600\ny\n").await.unwrap();

    assert_eq!(
        dialog.await.unwrap(),
        Some(DimensionsChoice {
            dimensions: Dimensions::new(800, 600),
            remember_site: false,
        })
    );
    assert_eq!(question.await.unwrap(), PromptAnswer::Yes);
}
