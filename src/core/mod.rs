//! Core business logic for Curator.
//!
//! # Modules
//!
//! - [`ingest`] - Push envelope decoding into task messages
//! - [`lifecycle`] - Record status machine and eligibility checks
//! - [`analysis`] - Derived field computation
//! - [`processing`] - Orchestration of the transactional transition and publish
//!
//! # Processing Workflow
//!
//! 1. **Decode**: base64 payload of the push envelope into `{documentId, batchId}`
//! 2. **Transact**: read the record, check it is `queued` with content, mark it
//!    `processing`, compute derived fields, write `processed`
//! 3. **Commit**: both writes land together or not at all
//! 4. **Publish**: announce `{documentId, batchId}` downstream and wait for
//!    confirmation
//! 5. **Acknowledge**: map the outcome onto 2xx/4xx/5xx
//!
//! # Example
//!
//! ```rust,no_run
//! use curator::adapters::memory::{MemoryNotifier, MemoryRecordStore};
//! use curator::core::analysis::StubAnalyzer;
//! use curator::core::processing::{ProcessingOrchestrator, ProcessingSettings};
//! use curator::domain::TopicId;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = ProcessingOrchestrator::new(
//!     Arc::new(MemoryRecordStore::new()),
//!     Arc::new(MemoryNotifier::new()),
//!     Arc::new(StubAnalyzer),
//!     ProcessingSettings::new(TopicId::new("integrate-article")?),
//! );
//!
//! let ack = orchestrator
//!     .handle_delivery(br#"{"message":{"data":"eyJkb2N1bWVudElkIjoiZG9jMSJ9"}}"#)
//!     .await;
//! println!("status {}", ack.status_code());
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod ingest;
pub mod lifecycle;
pub mod processing;
