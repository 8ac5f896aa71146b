//! Request socket for `shrunked serve`.
//! Protocol: JSON lines. Each request line carries its browsing context and a
//! content message; each completed request is answered with one
//! `Shrunked:Resized` line on the same connection. Cancelled requests get no reply.

use anyhow::{Context, Result};
use shrunked_core::bridge::ChromeEndpoint;
use shrunked_core::protocol::{wire, Resized};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;

/// Default socket path: `$XDG_STATE_HOME/shrunked/shrunked.sock`.
pub fn default_socket_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("shrunked")?;
    Ok(xdg_dirs.get_state_home().join("shrunked.sock"))
}

/// Binds `path` (replacing a stale socket) and spawns a task that forwards
/// every well-formed request line to `endpoint`. Malformed lines are logged and skipped.
pub fn spawn_request_listener(
    endpoint: ChromeEndpoint,
    path: impl AsRef<Path>,
) -> Result<tokio::task::JoinHandle<()>> {
    let path = path.as_ref().to_path_buf();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create socket directory {}", dir.display()))?;
    }
    let _ = std::fs::remove_file(&path);
    let listener = UnixListener::bind(&path)
        .with_context(|| format!("bind request socket {}", path.display()))?;
    tracing::info!(path = %path.display(), "listening for resize requests");

    let handle = tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let endpoint = endpoint.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(endpoint, stream).await {
                            tracing::debug!("request connection: {:#}", e);
                        }
                    });
                }
                Err(e) => tracing::debug!("request socket accept: {}", e),
            }
        }
    });
    Ok(handle)
}

async fn handle_connection(endpoint: ChromeEndpoint, stream: UnixStream) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<Resized>();

    // Replies are written as they complete, in completion order.
    let writer = tokio::spawn(async move {
        while let Some(resized) = reply_rx.recv().await {
            let line = match wire::encode_reply(&resized) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(index = resized.index, "encode reply: {:#}", e);
                    continue;
                }
            };
            if let Err(e) = write_half.write_all(line.as_bytes()).await {
                tracing::debug!(index = resized.index, "write reply: {}", e);
                break;
            }
        }
    });

    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("ignoring request line that is not UTF-8: {}", e);
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let request = match wire::decode_request(line) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("ignoring malformed request line: {:#}", e);
                continue;
            }
        };
        tracing::debug!(
            index = request.message.index(),
            name = request.message.name(),
            uri = %request.context.uri,
            "request received on socket"
        );
        endpoint.submit(Arc::new(request.context), request.message, reply_tx.clone())?;
    }

    // Writer finishes once in-flight requests for this connection drop their senders.
    drop(reply_tx);
    let _ = writer.await;
    Ok(())
}
