//! JSON-lines framing for talking to the orchestrator from another process.
//!
//! Requests: one `{"context": {...}, "message": {...}}` object per line.
//! Replies: one `{"name": "Shrunked:Resized", "data": {...}}` object per line.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{BrowsingContext, ChromeMessage, ContentMessage, Resized};

/// A content message together with the page it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRequest {
    pub context: BrowsingContext,
    pub message: ContentMessage,
}

pub fn decode_request(line: &str) -> Result<WireRequest> {
    serde_json::from_str(line.trim()).context("decode wire request")
}

/// Encoded request, newline-terminated.
pub fn encode_request(request: &WireRequest) -> Result<String> {
    let mut line = serde_json::to_string(request).context("encode wire request")?;
    line.push('\n');
    Ok(line)
}

pub fn decode_reply(line: &str) -> Result<Resized> {
    let ChromeMessage::Resized(resized) =
        serde_json::from_str::<ChromeMessage>(line.trim()).context("decode wire reply")?;
    Ok(resized)
}

/// Encoded reply, newline-terminated.
pub fn encode_reply(resized: &Resized) -> Result<String> {
    let mut line = serde_json::to_string(&ChromeMessage::Resized(resized.clone()))
        .context("encode wire reply")?;
    line.push('\n');
    Ok(line)
}
