//! Shared state for HTTP handlers

use crate::core::processing::ProcessingOrchestrator;
use std::sync::Arc;

/// State handed to every handler
///
/// Built once at startup; handlers only read it.
pub struct WebState {
    orchestrator: Arc<ProcessingOrchestrator>,
}

impl WebState {
    /// Wrap an orchestrator for the router
    pub fn new(orchestrator: Arc<ProcessingOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// The processing orchestrator
    pub fn orchestrator(&self) -> &ProcessingOrchestrator {
        &self.orchestrator
    }
}
