//! Chrome-side request loop: one task per request, results routed back by port.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::bridge::Inbound;

use super::Orchestrator;

/// Counters for one `serve` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    pub received: u64,
    pub completed: u64,
    pub cancelled: u64,
    pub failed: u64,
}

enum Outcome {
    Completed,
    Cancelled,
    Failed,
}

impl ServeStats {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Completed => self.completed += 1,
            Outcome::Cancelled => self.cancelled += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

impl Orchestrator {
    /// Handle requests from `inbox` until every sender is gone and every
    /// in-flight request has finished. Requests never wait on each other.
    pub async fn serve(self: Arc<Self>, mut inbox: mpsc::UnboundedReceiver<Inbound>) -> ServeStats {
        let mut stats = ServeStats::default();
        let mut join_set = JoinSet::new();

        loop {
            tokio::select! {
                inbound = inbox.recv() => {
                    let Some(inbound) = inbound else {
                        break;
                    };
                    stats.received += 1;
                    let orchestrator = Arc::clone(&self);
                    join_set.spawn(async move { orchestrator.dispatch(inbound).await });
                }
                Some(joined) = join_set.join_next(), if !join_set.is_empty() => {
                    stats.record(joined.unwrap_or_else(|e| {
                        tracing::warn!("request task join: {}", e);
                        Outcome::Failed
                    }));
                }
            }
        }

        while let Some(joined) = join_set.join_next().await {
            stats.record(joined.unwrap_or_else(|e| {
                tracing::warn!("request task join: {}", e);
                Outcome::Failed
            }));
        }
        tracing::debug!(?stats, "orchestrator inbox closed");
        stats
    }

    async fn dispatch(&self, inbound: Inbound) -> Outcome {
        let Inbound {
            context,
            message,
            reply,
        } = inbound;
        let index = message.index();
        tracing::debug!(index, name = message.name(), uri = %context.uri, "request received");

        match self.handle(&context, message).await {
            Ok(Some(resized)) => {
                if reply.send(resized).is_err() {
                    tracing::debug!(index, "content side gone before result arrived");
                }
                Outcome::Completed
            }
            Ok(None) => Outcome::Cancelled,
            Err(e) => {
                tracing::warn!(index, "request dropped: {:#}", e);
                Outcome::Failed
            }
        }
    }
}
