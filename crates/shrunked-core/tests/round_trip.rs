//! End-to-end: content interceptor ↔ bridge ↔ orchestrator task.
//!
//! Drives real temp files through a page's file inputs and checks what ends
//! up in each input.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use shrunked_core::bridge;
use shrunked_core::config::ShrunkedConfig;
use shrunked_core::content::{ContentInterceptor, SelectionMode};
use shrunked_core::dom::{ChangeTarget, FileInput, FormElement, MemoryFileInput, MemoryForm};
use shrunked_core::orchestrator::Orchestrator;
use shrunked_core::prefs::{MemoryPreferenceStore, SitePreference};
use shrunked_core::prompt::{DimensionsChoice, DimensionsRequest, PromptAnswer, Prompter, Question};
use shrunked_core::protocol::{BrowsingContext, Dimensions, Resized};
use shrunked_core::resize::{FileResizer, ResizeError};
use tempfile::TempDir;
use tokio::sync::mpsc;
use url::Url;

/// Always gives the same answers; counts how often it was asked.
struct FixedPrompter {
    answer: PromptAnswer,
    dialog: Option<DimensionsChoice>,
    asked: Mutex<usize>,
}

#[async_trait]
impl Prompter for FixedPrompter {
    async fn ask(&self, _question: &Question) -> PromptAnswer {
        *self.asked.lock().unwrap() += 1;
        self.answer
    }

    async fn choose_dimensions(&self, _request: &DimensionsRequest) -> Option<DimensionsChoice> {
        self.dialog
    }
}

struct PrefixResizer;

#[async_trait]
impl FileResizer for PrefixResizer {
    async fn resize(&self, file: &Path, _bounds: Dimensions, _quality: u8) -> Result<PathBuf, ResizeError> {
        let name = file.file_name().unwrap().to_string_lossy().into_owned();
        Ok(file.with_file_name(format!("resized_{name}")))
    }
}

struct Page {
    _dir: TempDir,
    dir: PathBuf,
    prefs: Arc<MemoryPreferenceStore>,
    prompter: Arc<FixedPrompter>,
    interceptor: ContentInterceptor,
    results: mpsc::UnboundedReceiver<Resized>,
}

fn page(uri: &str, answer: PromptAnswer, dialog: Option<DimensionsChoice>) -> Page {
    let mut cfg = ShrunkedConfig::default();
    cfg.min_file_size_kb = 1000;
    let prefs = Arc::new(MemoryPreferenceStore::new());
    let prompter = Arc::new(FixedPrompter {
        answer,
        dialog,
        asked: Mutex::new(0),
    });
    let orchestrator = Arc::new(Orchestrator::new(
        &cfg,
        prefs.clone(),
        prompter.clone(),
        Arc::new(PrefixResizer),
    ));

    let (endpoint, inbox) = bridge::channel();
    tokio::spawn(orchestrator.serve(inbox));
    let ctx = BrowsingContext::new(Url::parse(uri).unwrap(), false);
    let (port, results) = endpoint.connect(ctx);

    let tmp = tempfile::tempdir().unwrap();
    Page {
        dir: tmp.path().to_path_buf(),
        _dir: tmp,
        prefs,
        prompter,
        interceptor: ContentInterceptor::new(port),
        results,
    }
}

impl Page {
    fn file(&self, name: &str, len: u64) -> PathBuf {
        let path = self.dir.join(name);
        std::fs::File::create(&path).unwrap().set_len(len).unwrap();
        path
    }

    /// Wait for one result and apply it, as the content event loop would.
    async fn pump(&mut self) -> u64 {
        let resized = tokio::time::timeout(Duration::from_secs(5), self.results.recv())
            .await
            .expect("result in time")
            .expect("channel open");
        let index = resized.index;
        assert!(self.interceptor.on_resized(resized));
        index
    }

    async fn assert_no_result(&mut self) {
        let waited = tokio::time::timeout(Duration::from_millis(200), self.results.recv()).await;
        assert!(waited.is_err(), "no message may be sent for a cancelled request");
    }

    async fn wait_until_asked(&self) {
        for _ in 0..200 {
            if *self.prompter.asked.lock().unwrap() > 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("prompter was never asked");
    }
}

fn change(input: &Arc<MemoryFileInput>) -> ChangeTarget {
    ChangeTarget::FileInput(Arc::clone(input) as Arc<dyn FileInput>)
}

#[tokio::test]
async fn cached_form_size_resizes_large_jpeg_only() {
    let mut page = page("https://photos.example/", PromptAnswer::No, None);
    let a = page.file("a.jpg", 2_000_000);
    let b = page.file("b.png", 500_000);
    let form = MemoryForm::with_cache(Dimensions::new(800, 600).into());
    let input = MemoryFileInput::in_form(vec![a.clone(), b.clone()], form);

    let req = page.interceptor.on_change(&change(&input)).unwrap();
    assert_eq!(req.mode, SelectionMode::DirectResize(Dimensions::new(800, 600)));
    page.pump().await;

    assert_eq!(input.file_names(), vec![page.dir.join("resized_a.jpg"), b]);
    assert_eq!(*page.prompter.asked.lock().unwrap(), 0);
}

#[tokio::test]
async fn never_on_https_leaves_input_and_disables_site() {
    let mut page = page("https://photos.example/", PromptAnswer::Never, None);
    let c = page.file("c.jpeg", 2_000_000);
    let input = MemoryFileInput::new(vec![c.clone()]);

    let req = page.interceptor.on_change(&change(&input)).unwrap();
    assert_eq!(req.mode, SelectionMode::PromptAndResize);
    page.wait_until_asked().await;
    page.assert_no_result().await;

    assert_eq!(input.file_names(), vec![c]);
    let pref = SitePreference::load(page.prefs.as_ref(), "photos.example").await.unwrap();
    assert!(pref.disabled);
}

#[tokio::test]
async fn declined_prompt_leaves_input_and_pending_entry() {
    let mut page = page("https://photos.example/", PromptAnswer::No, None);
    let d = page.file("d.jpg", 2_000_000);
    let input = MemoryFileInput::new(vec![d.clone()]);

    let index = page.interceptor.on_change(&change(&input)).unwrap().index;
    page.wait_until_asked().await;
    page.assert_no_result().await;

    assert_eq!(input.file_names(), vec![d]);
    assert!(page.interceptor.registry().is_pending(index));
}

#[tokio::test]
async fn click_after_resize_restores_originals_once() {
    let dialog = Some(DimensionsChoice {
        dimensions: Dimensions::new(640, 480),
        remember_site: true,
    });
    let mut page = page("https://photos.example/", PromptAnswer::Yes, dialog);
    let a = page.file("a.jpg", 2_000_000);
    let b = page.file("b.jpg", 10);
    let form = MemoryForm::new();
    let input = MemoryFileInput::in_form(vec![a.clone(), b.clone()], Arc::clone(&form));

    page.interceptor.on_change(&change(&input)).unwrap();
    page.pump().await;
    assert_eq!(input.file_names(), vec![page.dir.join("resized_a.jpg"), b.clone()]);
    assert_eq!(form.size_cache().dimensions(), Some(Dimensions::new(640, 480)));

    assert_eq!(input.click(), 1);
    assert_eq!(input.file_names(), vec![a.clone(), b.clone()]);
    assert_eq!(input.click(), 0);
    assert_eq!(input.file_names(), vec![a, b]);

    let pref = SitePreference::load(page.prefs.as_ref(), "photos.example").await.unwrap();
    assert_eq!(pref.dimensions(), Some(Dimensions::new(640, 480)));
}

#[tokio::test]
async fn concurrent_inputs_resolve_independently() {
    let mut page = page("https://photos.example/", PromptAnswer::No, None);
    let a = page.file("a.jpg", 2_000_000);
    let b = page.file("b.jpg", 2_000_000);
    let size = Dimensions::new(800, 600);
    let input_a = MemoryFileInput::in_form(vec![a.clone()], MemoryForm::with_cache(size.into()));
    let input_b = MemoryFileInput::in_form(vec![b.clone()], MemoryForm::with_cache(size.into()));

    let ia = page.interceptor.on_change(&change(&input_a)).unwrap().index;
    let ib = page.interceptor.on_change(&change(&input_b)).unwrap().index;
    assert_ne!(ia, ib);

    let mut seen = vec![page.pump().await, page.pump().await];
    seen.sort();
    assert_eq!(seen, vec![ia, ib]);

    assert_eq!(input_a.file_names(), vec![page.dir.join("resized_a.jpg")]);
    assert_eq!(input_b.file_names(), vec![page.dir.join("resized_b.jpg")]);
    assert!(page.interceptor.registry().is_empty());
}
