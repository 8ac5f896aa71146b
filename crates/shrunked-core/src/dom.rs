//! Host page surface touched by the content side.
//!
//! The interceptor only needs to read and write an input's file list, find
//! its form, stash the negotiated size on that form and arm a one-shot click
//! handler. `MemoryFileInput` / `MemoryForm` implement that surface in memory
//! for the CLI simulator and tests.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::protocol::Dimensions;

/// Handler run once on the next user click, then dropped.
pub type ClickHandler = Box<dyn FnOnce(&dyn FileInput) + Send>;

/// Size remembered on a form instance (`data-shrunkedmaxwidth` / `data-shrunkedmaxheight`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormSizeCache {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl FormSizeCache {
    /// The cached size, only when both bounds are present.
    pub fn dimensions(&self) -> Option<Dimensions> {
        Dimensions::from_parts(self.max_width, self.max_height)
    }
}

impl From<Dimensions> for FormSizeCache {
    fn from(d: Dimensions) -> Self {
        Self {
            max_width: Some(d.max_width),
            max_height: Some(d.max_height),
        }
    }
}

pub trait FormElement: Send + Sync {
    fn size_cache(&self) -> FormSizeCache;
    fn set_size_cache(&self, dimensions: Dimensions);
}

pub trait FileInput: Send + Sync {
    fn file_names(&self) -> Vec<PathBuf>;
    fn set_file_names(&self, files: Vec<PathBuf>);
    fn form(&self) -> Option<Arc<dyn FormElement>>;
    /// Register `handler` to run on the next click only.
    fn once_on_click(&self, handler: ClickHandler);
}

/// Target of a `change` event, as seen by the interceptor.
pub enum ChangeTarget {
    FileInput(Arc<dyn FileInput>),
    /// Anything that is not `<input type="file">`.
    Other,
}

#[derive(Debug, Default)]
pub struct MemoryForm {
    cache: Mutex<FormSizeCache>,
}

impl MemoryForm {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_cache(cache: FormSizeCache) -> Arc<Self> {
        Arc::new(Self {
            cache: Mutex::new(cache),
        })
    }
}

impl FormElement for MemoryForm {
    fn size_cache(&self) -> FormSizeCache {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_size_cache(&self, dimensions: Dimensions) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = dimensions.into();
    }
}

#[derive(Default)]
pub struct MemoryFileInput {
    files: Mutex<Vec<PathBuf>>,
    form: Option<Arc<MemoryForm>>,
    click_handlers: Mutex<Vec<ClickHandler>>,
}

impl MemoryFileInput {
    pub fn new(files: Vec<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            files: Mutex::new(files),
            ..Self::default()
        })
    }

    pub fn in_form(files: Vec<PathBuf>, form: Arc<MemoryForm>) -> Arc<Self> {
        Arc::new(Self {
            files: Mutex::new(files),
            form: Some(form),
            click_handlers: Mutex::default(),
        })
    }

    /// Simulate a user click: every armed handler fires once and is removed.
    /// Returns how many handlers ran.
    pub fn click(&self) -> usize {
        let handlers =
            std::mem::take(&mut *self.click_handlers.lock().unwrap_or_else(PoisonError::into_inner));
        let fired = handlers.len();
        for handler in handlers {
            handler(self as &dyn FileInput);
        }
        fired
    }

    pub fn armed_click_handlers(&self) -> usize {
        self.click_handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl FileInput for MemoryFileInput {
    fn file_names(&self) -> Vec<PathBuf> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_file_names(&self, files: Vec<PathBuf>) {
        *self.files.lock().unwrap_or_else(PoisonError::into_inner) = files;
    }

    fn form(&self) -> Option<Arc<dyn FormElement>> {
        self.form
            .as_ref()
            .map(|f| Arc::clone(f) as Arc<dyn FormElement>)
    }

    fn once_on_click(&self, handler: ClickHandler) {
        self.click_handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }
}
