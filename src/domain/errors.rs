//! Domain error types
//!
//! This module defines the error hierarchy for Curator. Every failure that can
//! cross the processing boundary is one of these variants, and each variant
//! knows whether the delivery system should redeliver the triggering message.
//! Errors don't expose third-party types.

use crate::domain::record::RecordStatus;
use thiserror::Error;

/// Main Curator error type
///
/// This is the primary error type used throughout the application.
/// Store and publisher failures are wrapped in their own enums so that
/// adapters can report precise causes without leaking SDK types.
#[derive(Debug, Error)]
pub enum CuratorError {
    /// The delivery envelope is absent, lacks `message.data`, or its payload
    /// is not base64-encoded structured text
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The decoded task message has the wrong shape
    #[error("Validation error: {0}")]
    Validation(String),

    /// No record exists for the requested document
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The record is not in a status that allows processing
    #[error("Record {document_id} is in status '{status}', expected 'queued'")]
    InvalidState {
        document_id: String,
        status: RecordStatus,
    },

    /// The record has no raw text to analyze
    #[error("Record {0} has no raw text")]
    MissingContent(String),

    /// Record store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Publisher errors
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Anything else that went wrong while handling a delivery
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl CuratorError {
    /// Stable, snake_case tag identifying the error kind in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedEnvelope(_) => "malformed_envelope",
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::InvalidState { .. } => "invalid_state",
            Self::MissingContent(_) => "missing_content",
            Self::Store(StoreError::Conflict(_)) => "store_conflict",
            Self::Store(_) => "store_unavailable",
            Self::Publish(PublishError::Timeout(_)) => "publish_timeout",
            Self::Publish(_) => "publish_failure",
            Self::Configuration(_) => "configuration_error",
            Self::Serialization(_) => "serialization_error",
            Self::Io(_) => "io_error",
            Self::Unexpected(_) => "unexpected_error",
        }
    }

    /// Whether the delivery that caused this error should be redelivered
    ///
    /// Store, publish and unexpected failures are retryable. Local
    /// serialization and I/O errors repeat on redelivery, as do bad input and
    /// ineligible records.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Publish(_) | Self::Unexpected(_)
        )
    }

    /// Whether the error describes an inbound message that can never be processed
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::MalformedEnvelope(_) | Self::Validation(_))
    }
}

/// Record store errors
///
/// Errors that occur while reading or writing records. These don't expose
/// the underlying driver types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The transaction lost a race with a concurrent writer
    #[error("Transaction conflict: {0}")]
    Conflict(String),

    /// The store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A read or write statement failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A persisted record could not be decoded
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Publisher errors
#[derive(Debug, Error)]
pub enum PublishError {
    /// The publisher did not confirm the message within the allowed time
    #[error("Publish not confirmed within {0} seconds")]
    Timeout(u64),

    /// The publish request failed in transit
    #[error("Publish failed: {0}")]
    Failed(String),

    /// The publisher answered but refused the message
    #[error("Publish rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl From<std::io::Error> for CuratorError {
    fn from(err: std::io::Error) -> Self {
        CuratorError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CuratorError {
    fn from(err: serde_json::Error) -> Self {
        CuratorError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CuratorError {
    fn from(err: toml::de::Error) -> Self {
        CuratorError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<base64::DecodeError> for CuratorError {
    fn from(err: base64::DecodeError) -> Self {
        CuratorError::MalformedEnvelope(format!("message data is not valid base64: {err}"))
    }
}
