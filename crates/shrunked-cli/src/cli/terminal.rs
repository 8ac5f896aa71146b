//! Prompter that asks on the terminal. Questions go to stderr so stdout only
//! carries command output.

use async_trait::async_trait;
use shrunked_core::prompt::{
    DimensionsChoice, DimensionsRequest, PromptAnswer, Prompter, Question,
};
use shrunked_core::protocol::Dimensions;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

pub struct TerminalPrompter<R = BufReader<Stdin>> {
    input: Mutex<Lines<R>>,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::with_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> TerminalPrompter<R> {
    pub fn with_reader(reader: R) -> Self {
        Self {
            input: Mutex::new(reader.lines()),
        }
    }
}

/// Print `prompt` and read one trimmed line. `None` on EOF or read error.
async fn read_answer<R>(input: &mut Lines<R>, prompt: &str) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    eprint!("{prompt}");
    match input.next_line().await {
        Ok(Some(line)) => Some(line.trim().to_string()),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("reading terminal answer: {}", e);
            None
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

/// Each call holds stdin for its whole exchange, so a multi-line dialog is
/// never interleaved with another request's question.
#[async_trait]
impl<R> Prompter for TerminalPrompter<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn ask(&self, question: &Question) -> PromptAnswer {
        let options = if question.offers(PromptAnswer::Never) {
            "[y]es / ne[v]er / [N]o"
        } else {
            "[y]es / [N]o"
        };
        let mut input = self.input.lock().await;
        let line = read_answer(&mut input, &format!("{} {}: ", question.text, options))
            .await
            .unwrap_or_default();
        parse_answer(&line, question)
    }

    async fn choose_dimensions(&self, request: &DimensionsRequest) -> Option<DimensionsChoice> {
        let mut input = self.input.lock().await;
        eprintln!("Resize {} image(s):", request.images.len());
        for image in &request.images {
            eprintln!("  {}", image.display());
        }
        let width = read_answer(
            &mut input,
            &format!("Max width [{}]: ", request.suggested.max_width),
        )
        .await?;
        let max_width = parse_side(&width, request.suggested.max_width)?;
        let height = read_answer(
            &mut input,
            &format!("Max height [{}]: ", request.suggested.max_height),
        )
        .await?;
        let max_height = parse_side(&height, request.suggested.max_height)?;

        let remember_site = if request.can_remember {
            let line = read_answer(&mut input, "Remember this size for the site? [y/N]: ")
                .await
                .unwrap_or_default();
            is_yes(&line)
        } else {
            false
        };
        Some(DimensionsChoice {
            dimensions: Dimensions::new(max_width, max_height),
            remember_site,
        })
    }
}

fn is_yes(line: &str) -> bool {
    matches!(line.to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Anything unrecognised, and "never" where it is not offered, means No.
pub(crate) fn parse_answer(line: &str, question: &Question) -> PromptAnswer {
    match line.to_ascii_lowercase().as_str() {
        "y" | "yes" => PromptAnswer::Yes,
        "v" | "never" if question.offers(PromptAnswer::Never) => PromptAnswer::Never,
        _ => PromptAnswer::No,
    }
}

/// Empty keeps the suggestion. Anything that is not a positive number cancels the dialog.
pub(crate) fn parse_side(line: &str, suggested: u32) -> Option<u32> {
    if line.is_empty() {
        return Some(suggested);
    }
    match line.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}
