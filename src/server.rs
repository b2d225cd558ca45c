use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::error::Result;
use crate::pipeline::Pipeline;

const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// Shared across HTTP handlers. The pipeline holds its own repository
/// handle, so one run at a time per request is fine.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub cron_secret: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    store: Option<crate::db::StoreStats>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    // Store counts are informational; a stats failure is not unhealthy.
    let store = state.pipeline.repository().stats().await.ok();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
        store,
    })
}

/// When a secret is configured, the caller must present it verbatim in
/// the `X-Cron-Secret` header. No secret configured means open trigger.
fn authorized(secret: Option<&str>, presented: Option<&str>) -> bool {
    match secret {
        None => true,
        Some(expected) => presented == Some(expected),
    }
}

/// POST /trigger — run the pipeline once and return the run summary.
async fn trigger(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, Json<serde_json::Value>) {
    let presented = headers
        .get(CRON_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());
    if !authorized(state.cron_secret.as_deref(), presented) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid or missing cron secret"})),
        );
    }

    let summary = state.pipeline.run().await;
    match serde_json::to_value(&summary) {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        ),
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trigger", post(trigger))
        .with_state(state)
}

/// Serve the control surface until the process is stopped.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "Control surface listening");
    axum::serve(listener, router)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_secret_means_open_trigger() {
        assert!(authorized(None, None));
        assert!(authorized(None, Some("anything")));
    }

    #[test]
    fn secret_must_match_exactly() {
        assert!(authorized(Some("s3cret"), Some("s3cret")));
        assert!(!authorized(Some("s3cret"), Some("wrong")));
        assert!(!authorized(Some("s3cret"), None));
        assert!(!authorized(Some("s3cret"), Some("S3CRET")));
    }
}
