//! Logging and observability
//!
//! Structured logging through `tracing`, plus a few macros that keep the
//! field names of recurring events consistent across modules.
//!
//! # Example
//!
//! ```no_run
//! use curator::logging::init_logging;
//! use curator::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Service started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of processing for one task message
///
/// # Example
///
/// ```no_run
/// use curator::log_processing_start;
/// use curator::domain::{BatchId, DocumentId};
///
/// let document_id = DocumentId::new("doc1").unwrap();
/// log_processing_start!(&document_id, &BatchId::unknown());
/// ```
#[macro_export]
macro_rules! log_processing_start {
    ($document_id:expr, $batch_id:expr) => {
        tracing::info!(
            document_id = %$document_id,
            batch_id = %$batch_id,
            "Processing document"
        );
    };
}

/// Log a committed and published document
///
/// # Example
///
/// ```no_run
/// use curator::log_processing_complete;
/// use curator::domain::DocumentId;
/// use std::time::Duration;
///
/// let document_id = DocumentId::new("doc1").unwrap();
/// log_processing_complete!(&document_id, "msg-1", Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_processing_complete {
    ($document_id:expr, $message_id:expr, $duration:expr) => {
        tracing::info!(
            document_id = %$document_id,
            message_id = %$message_id,
            duration_ms = $duration.as_millis() as u64,
            "Document processed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use curator::log_error_with_context;
/// use curator::domain::CuratorError;
///
/// let error = CuratorError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            kind = $error.kind(),
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use curator::log_retry_attempt;
///
/// log_retry_attempt!(2, 5, "transaction conflict");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = $reason,
            "Retrying operation"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::{BatchId, CuratorError, DocumentId};
    use std::time::Duration;

    #[test]
    fn test_macros_expand_without_subscriber() {
        let document_id = DocumentId::new("doc1").unwrap();
        let error = CuratorError::NotFound("doc1".to_string());

        log_processing_start!(&document_id, &BatchId::unknown());
        log_processing_complete!(&document_id, "msg-1", Duration::from_millis(5));
        log_error_with_context!(&error, "lookup");
        log_retry_attempt!(1u32, 5u32, "conflict");
    }
}
