//! Health probe: GET /health

use crate::web::state::WebState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

/// Probe response body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 200 when the record store answers, 503 otherwise
pub async fn health_check(State(state): State<Arc<WebState>>) -> (StatusCode, Json<HealthResponse>) {
    let store = state.orchestrator().store();
    match store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                error: None,
            }),
        ),
        Err(err) => {
            tracing::warn!(
                backend = store.backend_name(),
                error = %err,
                "Health check failed"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    error: Some(err.to_string()),
                }),
            )
        }
    }
}
