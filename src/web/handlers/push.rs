//! Push endpoint: POST /
//!
//! Receives one queue delivery per request. The response code is the
//! acknowledgment: 2xx and 4xx settle the delivery, 5xx asks for redelivery.

use crate::core::processing::Acknowledgment;
use crate::web::state::WebState;
use axum::body::Bytes;
use axum::extract::State;
use std::sync::Arc;

/// Handle a push delivery
///
/// The body is read raw so malformed JSON is answered with the same
/// error body as every other rejection.
pub async fn receive_push(State(state): State<Arc<WebState>>, body: Bytes) -> Acknowledgment {
    state.orchestrator().handle_delivery(&body).await
}
