//! HTTP surface
//!
//! - `POST /` - push endpoint for queue deliveries
//! - `GET /health` - probe backed by the record store
//!
//! # Example
//!
//! ```rust,no_run
//! use curator::adapters::memory::{MemoryNotifier, MemoryRecordStore};
//! use curator::core::analysis::StubAnalyzer;
//! use curator::core::processing::{ProcessingOrchestrator, ProcessingSettings};
//! use curator::domain::TopicId;
//! use curator::web::{create_app, WebState};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = ProcessingOrchestrator::new(
//!     Arc::new(MemoryRecordStore::new()),
//!     Arc::new(MemoryNotifier::new()),
//!     Arc::new(StubAnalyzer),
//!     ProcessingSettings::new(TopicId::new("integrate-article")?),
//! );
//! let app = create_app(
//!     Arc::new(WebState::new(Arc::new(orchestrator))),
//!     Duration::from_secs(60),
//! );
//! # Ok(())
//! # }
//! ```

use crate::domain::{CuratorError, Result};
use axum::http::StatusCode;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;

pub use state::WebState;

/// Create the application router with all routes and middleware
///
/// A request that exceeds `request_timeout` is answered with 504 so the
/// delivery is retried.
pub fn create_app(state: Arc<WebState>, request_timeout: Duration) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ));

    Router::new()
        .merge(routes::push_routes())
        .merge(routes::health_routes())
        .layer(middleware)
        .with_state(state)
}

/// Serve `app` on `listener` until `shutdown` resolves
///
/// In-flight requests are allowed to finish after the signal.
///
/// # Errors
///
/// Returns [`CuratorError::Io`] if the server fails.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| CuratorError::Io(format!("HTTP server error: {e}")))?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
