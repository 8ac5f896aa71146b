//! `shrunked serve` – answer resize requests from other processes over a Unix socket.

use anyhow::Result;
use shrunked_core::bridge;
use shrunked_core::config::ShrunkedConfig;
use std::path::PathBuf;
use std::sync::Arc;

use super::build_orchestrator;
use crate::cli::socket;

pub async fn run_serve(cfg: &ShrunkedConfig, socket_path: Option<PathBuf>) -> Result<()> {
    let socket_path = match socket_path {
        Some(path) => path,
        None => socket::default_socket_path()?,
    };
    let orchestrator = Arc::new(build_orchestrator(cfg).await?);
    let (endpoint, inbox) = bridge::channel();

    let listener = socket::spawn_request_listener(endpoint, &socket_path)?;
    println!("Listening on {}", socket_path.display());

    let mut serving = tokio::spawn(orchestrator.serve(inbox));
    tokio::select! {
        joined = &mut serving => {
            match joined {
                Ok(stats) => tracing::info!(?stats, "request loop finished"),
                Err(e) => tracing::warn!("request loop join: {}", e),
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("interrupted; shutting down");
        }
    }

    listener.abort();
    serving.abort();
    let _ = std::fs::remove_file(&socket_path);
    Ok(())
}
