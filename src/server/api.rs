//! Axum handlers for `/api/*` routes.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::warn;

use super::AppState;
use crate::agent::AnalysisRequest;
use crate::llm::ProviderKind;

/// Upper bound on one analyze chain: log fetch plus provider completion.
const ANALYZE_TIMEOUT: Duration = Duration::from_secs(300);

/// Build a JSON error response body.
fn json_error(msg: impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": format!("{msg}") }))
}

/// POST /api/analyze
pub(super) async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Response {
    match tokio::time::timeout(ANALYZE_TIMEOUT, state.analyzer.analyze(&request)).await {
        Ok(Ok(result)) => (StatusCode::OK, Json(result)).into_response(),
        Ok(Err(e)) => {
            warn!(error = %e, "analyze request failed");
            e.into_response()
        }
        Err(_) => {
            warn!("analyze request timed out");
            (
                StatusCode::GATEWAY_TIMEOUT,
                json_error("analysis timed out"),
            )
                .into_response()
        }
    }
}

/// GET /api/providers — static, configuration-driven listing.
pub(super) async fn providers(State(state): State<AppState>) -> Response {
    let mut providers = serde_json::Map::new();
    let mut models = serde_json::Map::new();
    for kind in ProviderKind::listed() {
        providers.insert(kind.name().to_string(), json!(kind.label()));
        models.insert(kind.name().to_string(), json!(kind.known_models()));
    }

    let body = json!({
        "providers": providers,
        "models": models,
        "default_provider": state.analyzer.default_provider().name(),
    });
    (StatusCode::OK, Json(body)).into_response()
}

/// GET /api/health
pub(super) async fn health(State(state): State<AppState>) -> Response {
    let body = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "default_provider": state.analyzer.default_provider().name(),
    });
    (StatusCode::OK, Json(body)).into_response()
}
