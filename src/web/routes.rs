//! Route definitions

use crate::web::{handlers, state::WebState};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Push delivery endpoint
pub fn push_routes() -> Router<Arc<WebState>> {
    Router::new().route("/", post(handlers::push::receive_push))
}

/// Liveness/readiness probe
pub fn health_routes() -> Router<Arc<WebState>> {
    Router::new().route("/health", get(handlers::health::health_check))
}
