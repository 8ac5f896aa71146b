//! In-process message bridge between content ports and the orchestrator.
//!
//! Each content port is bound to one browsing context. Requests flow into a
//! single chrome-side inbox; every request carries the reply sender of the
//! port it came from, so results find their way back to the right page.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::protocol::{BrowsingContext, ContentMessage, Resized};

/// A request as received by the chrome side.
#[derive(Debug)]
pub struct Inbound {
    pub context: Arc<BrowsingContext>,
    pub message: ContentMessage,
    pub reply: mpsc::UnboundedSender<Resized>,
}

/// Chrome-side handle used to open new content ports.
#[derive(Debug, Clone)]
pub struct ChromeEndpoint {
    inbox: mpsc::UnboundedSender<Inbound>,
}

/// Create the chrome inbox. The receiver is handed to `Orchestrator::serve`.
pub fn channel() -> (ChromeEndpoint, mpsc::UnboundedReceiver<Inbound>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChromeEndpoint { inbox: tx }, rx)
}

impl ChromeEndpoint {
    /// Open a port for a page. Results for requests sent through the port
    /// arrive on the returned receiver.
    pub fn connect(&self, context: BrowsingContext) -> (ContentPort, mpsc::UnboundedReceiver<Resized>) {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        let port = ContentPort {
            context: Arc::new(context),
            to_chrome: self.inbox.clone(),
            reply: reply_tx,
        };
        (port, reply_rx)
    }

    /// Queue a request from a sender that is not a `ContentPort` (e.g. a
    /// socket connection carrying its own context per request).
    pub fn submit(
        &self,
        context: Arc<BrowsingContext>,
        message: ContentMessage,
        reply: mpsc::UnboundedSender<Resized>,
    ) -> Result<()> {
        self.inbox
            .send(Inbound {
                context,
                message,
                reply,
            })
            .map_err(|e| anyhow::anyhow!("chrome side closed; dropped {}", e.0.message.name()))
    }
}

/// Content-side sending half, bound to one page.
#[derive(Debug, Clone)]
pub struct ContentPort {
    context: Arc<BrowsingContext>,
    to_chrome: mpsc::UnboundedSender<Inbound>,
    reply: mpsc::UnboundedSender<Resized>,
}

impl ContentPort {
    pub fn context(&self) -> &BrowsingContext {
        &self.context
    }

    /// Fire-and-forget send; fails only when the chrome side is gone.
    pub fn send(&self, message: ContentMessage) -> Result<()> {
        self.to_chrome
            .send(Inbound {
                context: Arc::clone(&self.context),
                message,
                reply: self.reply.clone(),
            })
            .map_err(|e| anyhow::anyhow!("chrome side closed; dropped {}", e.0.message.name()))
    }
}
