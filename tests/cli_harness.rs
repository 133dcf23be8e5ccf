#![allow(dead_code)]

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::process::Output;
use tokio::sync::oneshot;

pub type TestResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Minimal gateway answering `/health` and `/cloudflare-tunnel`.
pub struct MockGateway {
    pub api_base: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "timestamp": 1_760_600_000.0 }))
}

async fn tunnel() -> Json<Value> {
    Json(json!({ "status": "not_running", "error": "cloudflared not installed" }))
}

impl MockGateway {
    pub async fn start() -> TestResult<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = Router::new()
            .route("/dashboard/api/health", get(health))
            .route("/dashboard/api/cloudflare-tunnel", get(tunnel));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Self {
            api_base: format!("http://{}/dashboard/api", addr),
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

pub fn nanodash_binary_path() -> TestResult<PathBuf> {
    if let Some(path) = option_env!("CARGO_BIN_EXE_nanodash") {
        return Ok(PathBuf::from(path));
    }

    let candidate = PathBuf::from("target")
        .join("debug")
        .join(if cfg!(windows) { "nanodash.exe" } else { "nanodash" });
    if candidate.exists() {
        return Ok(candidate);
    }

    Err("Could not locate nanodash test binary path".into())
}

/// Run the binary with an isolated data directory and no inherited API URL.
pub async fn run_nanodash(args: &[&str], data_dir: &std::path::Path) -> TestResult<Output> {
    let output = tokio::process::Command::new(nanodash_binary_path()?)
        .args(args)
        .env("NANODASH_DATA_DIR", data_dir)
        .env_remove("NANODASH_API_URL")
        .env("NO_COLOR", "1")
        .output()
        .await?;
    Ok(output)
}
