//! HTTP surface — axum router over the analyzer.
//!
//! ## URL layout
//!
//! ```text
//! POST /api/analyze      — run the parse → fetch → complete chain
//! GET  /api/providers    — provider name → known model list
//! GET  /api/health       — liveness probe
//! GET  /favicon.ico      → 204
//! GET  /                 → HTML form UI
//! ```

mod api;
mod ui;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing::info;

use crate::agent::Analyzer;
use crate::error::AppError;

/// Router state injected into every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(api::analyze))
        .route("/api/providers", get(api::providers))
        .route("/api/health", get(api::health))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .route("/", get(ui::root))
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn run(bind_addr: &str, state: AppState) -> Result<(), AppError> {
    let router = build_router(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| AppError::Server(format!("bind failed on {bind_addr}: {e}")))?;

    info!(%bind_addr, "http server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .map_err(|e| AppError::Server(format!("server error: {e}")))?;

    info!("http server shut down");
    Ok(())
}
