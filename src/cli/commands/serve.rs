//! Serve command implementation
//!
//! Builds the store, notifier and orchestrator from configuration and runs
//! the webhook until a shutdown signal arrives.

use crate::adapters::publisher::create_notifier;
use crate::adapters::store::create_record_store;
use crate::config::{load_config, CuratorConfig};
use crate::core::analysis::StubAnalyzer;
use crate::core::processing::{ProcessingOrchestrator, ProcessingSettings};
use crate::web::{create_app, serve, WebState};
use clap::Args;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Create the staging table before serving (local development)
    #[arg(long)]
    pub ensure_schema: bool,
}

/// Wire the orchestrator from configuration
///
/// # Errors
///
/// Returns an error if a backend cannot be built.
pub fn build_orchestrator(config: &CuratorConfig) -> crate::domain::Result<ProcessingOrchestrator> {
    let store = create_record_store(config)?;
    let notifier = create_notifier(&config.publisher)?;
    let settings = ProcessingSettings::from_config(config)?;

    Ok(ProcessingOrchestrator::new(
        store,
        notifier,
        Arc::new(StubAnalyzer),
        settings,
    ))
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, config_path = %config_path, "Failed to load configuration");
                eprintln!("Error: {e}");
                return Ok(2);
            }
        };

        let orchestrator = match build_orchestrator(&config) {
            Ok(o) => o,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to build processing pipeline");
                return Ok(2);
            }
        };

        if self.ensure_schema {
            if let Err(e) = orchestrator.store().ensure_schema().await {
                crate::log_error_with_context!(&e, "Failed to create schema");
                return Ok(4);
            }
        }

        tracing::info!(
            store = orchestrator.store().backend_name(),
            topic = %orchestrator.settings().topic,
            policy = ?orchestrator.settings().ineligible_policy,
            "Processing pipeline ready"
        );

        let addr = config
            .server
            .socket_addr()
            .map_err(|e| anyhow::anyhow!(e))?;
        let listener = match TcpListener::bind(addr).await {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(error = %e, address = %addr, "Failed to bind");
                return Ok(4);
            }
        };

        let state = Arc::new(WebState::new(Arc::new(orchestrator)));
        let app = create_app(state, config.server.request_timeout());

        let shutdown = async move {
            let _ = shutdown_signal.wait_for(|stop| *stop).await;
            tracing::info!("Shutdown requested, draining in-flight requests");
        };

        serve(listener, app, shutdown).await?;
        Ok(0)
    }
}
