//! Messages exchanged between the content side and the chrome side.
//!
//! Two kinds travel content → chrome (`Shrunked:Resize` when the form already
//! knows its target size, `Shrunked:PromptAndResize` when it doesn't) and one
//! travels back (`Shrunked:Resized`). A cancelled request produces no reply.

mod replacement;
pub mod wire;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

pub use replacement::ReplacementMap;

/// Correlation index of one in-flight request.
pub type RequestIndex = u64;

/// Target bounds for a resize. Images are scaled to fit inside both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub max_width: u32,
    pub max_height: u32,
}

impl Dimensions {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    /// Both bounds present and non-zero.
    pub fn from_parts(max_width: Option<u32>, max_height: Option<u32>) -> Option<Self> {
        match (max_width, max_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(Self::new(w, h)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.max_width, self.max_height)
    }
}

/// The page a content port belongs to. The chrome side reads origin and
/// private-browsing state from here, never from the message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowsingContext {
    pub uri: Url,
    #[serde(default)]
    pub private: bool,
}

impl BrowsingContext {
    pub fn new(uri: Url, private: bool) -> Self {
        Self { uri, private }
    }

    /// Only http(s) origins may read or write site preferences.
    pub fn is_http(&self) -> bool {
        matches!(self.uri.scheme(), "http" | "https")
    }

    pub fn host(&self) -> Option<&str> {
        self.uri.host_str()
    }
}

/// Content → chrome request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "data")]
pub enum ContentMessage {
    #[serde(rename = "Shrunked:Resize", rename_all = "camelCase")]
    Resize {
        index: RequestIndex,
        files: Vec<PathBuf>,
        max_width: u32,
        max_height: u32,
    },
    #[serde(rename = "Shrunked:PromptAndResize")]
    PromptAndResize {
        index: RequestIndex,
        files: Vec<PathBuf>,
    },
}

impl ContentMessage {
    pub fn index(&self) -> RequestIndex {
        match self {
            ContentMessage::Resize { index, .. } | ContentMessage::PromptAndResize { index, .. } => {
                *index
            }
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        match self {
            ContentMessage::Resize { files, .. } | ContentMessage::PromptAndResize { files, .. } => {
                files
            }
        }
    }

    /// Dimensions carried by a direct resize; `None` means they must be negotiated.
    /// A zero bound counts as missing.
    pub fn dimensions(&self) -> Option<Dimensions> {
        match self {
            ContentMessage::Resize {
                max_width,
                max_height,
                ..
            } => Dimensions::from_parts(Some(*max_width), Some(*max_height)),
            ContentMessage::PromptAndResize { .. } => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContentMessage::Resize { .. } => "Shrunked:Resize",
            ContentMessage::PromptAndResize { .. } => "Shrunked:PromptAndResize",
        }
    }
}

/// Chrome → content result, sent only when a request completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resized {
    pub index: RequestIndex,
    pub replacements: ReplacementMap,
    pub max_width: u32,
    pub max_height: u32,
}

impl Resized {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.max_width, self.max_height)
    }
}

/// Envelope for everything the chrome side sends back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "data")]
pub enum ChromeMessage {
    #[serde(rename = "Shrunked:Resized")]
    Resized(Resized),
}
