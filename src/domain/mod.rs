//! Domain models and types for Curator.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`DocumentId`], [`BatchId`], [`TopicId`])
//! - **Records** ([`Record`], [`RecordStatus`], [`DerivedFields`], [`RecordUpdate`])
//! - **Messages** ([`TaskMessage`], [`OutboundMessage`])
//! - **Error types** ([`CuratorError`], [`StoreError`], [`PublishError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, CuratorError>`]:
//!
//! ```rust
//! use curator::domain::{CuratorError, DocumentId, Result};
//!
//! fn parse(id: &str) -> Result<DocumentId> {
//!     DocumentId::new(id).map_err(CuratorError::Validation)
//! }
//!
//! assert!(parse("doc1").is_ok());
//! assert!(parse("").is_err());
//! ```

pub mod errors;
pub mod ids;
pub mod message;
pub mod record;
pub mod result;

pub use errors::{CuratorError, PublishError, StoreError};
pub use ids::{BatchId, DocumentId, TopicId, UNKNOWN_BATCH_ID};
pub use message::{OutboundMessage, TaskMessage};
pub use record::{DerivedFields, Record, RecordStatus, RecordUpdate};
pub use result::Result;
