//! Processing outcomes and delivery acknowledgments
//!
//! [`ProcessingOutcome`] is what happened to a record. [`Acknowledgment`] is
//! what the delivery system is told, which also depends on the configured
//! [`IneligiblePolicy`].

use crate::config::IneligiblePolicy;
use crate::domain::{CuratorError, DocumentId, RecordStatus};
use serde::Serialize;
use std::fmt;

/// Why an eligible-looking delivery changed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No record exists for the document id
    NotFound,
    /// The record has already moved past `queued`
    InvalidState(RecordStatus),
    /// The record has no raw text to analyze
    MissingContent,
}

impl SkipReason {
    /// Classify an eligibility error, or `None` for any other error
    pub fn from_error(err: &CuratorError) -> Option<Self> {
        match err {
            CuratorError::NotFound(_) => Some(Self::NotFound),
            CuratorError::InvalidState { status, .. } => Some(Self::InvalidState(*status)),
            CuratorError::MissingContent(_) => Some(Self::MissingContent),
            _ => None,
        }
    }

    /// Same tag as the corresponding [`CuratorError::kind`]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidState(_) => "invalid_state",
            Self::MissingContent => "missing_content",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("record not found"),
            Self::InvalidState(status) => write!(f, "record is {status}, expected queued"),
            Self::MissingContent => f.write_str("record has no raw text"),
        }
    }
}

/// Result of processing one task message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// The record was moved to `processed` and the notification published
    Committed {
        document_id: DocumentId,
        message_id: String,
    },
    /// The record was not eligible; nothing was written or published
    Skipped {
        document_id: DocumentId,
        reason: SkipReason,
    },
}

/// JSON body returned with 4xx/5xx answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// Answer to one delivery, in the queue's acknowledgment protocol
///
/// 2xx and 4xx acknowledge the delivery; 5xx asks for redelivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgment {
    /// Processed, or deliberately skipped
    Accepted,
    /// Permanently unprocessable message
    Rejected(ErrorBody),
    /// Transient failure; redeliver
    Retry(ErrorBody),
}

impl Acknowledgment {
    /// Build the answer for a processing outcome under `policy`
    ///
    /// A missing record is always acknowledged: it was either never staged or
    /// belongs to a stage this service does not own.
    pub fn for_outcome(outcome: &ProcessingOutcome, policy: IneligiblePolicy) -> Self {
        match outcome {
            ProcessingOutcome::Committed { .. } => Self::Accepted,
            ProcessingOutcome::Skipped {
                reason: SkipReason::NotFound,
                ..
            } => Self::Accepted,
            ProcessingOutcome::Skipped {
                document_id,
                reason,
            } => match policy {
                IneligiblePolicy::Acknowledge => Self::Accepted,
                IneligiblePolicy::Reject => Self::Rejected(ErrorBody {
                    error: reason.kind(),
                    message: format!("{document_id}: {reason}"),
                }),
            },
        }
    }

    /// Build the answer for an error that escaped processing
    pub fn for_error(err: &CuratorError) -> Self {
        let body = ErrorBody {
            error: err.kind(),
            message: err.to_string(),
        };
        if err.is_bad_request() {
            Self::Rejected(body)
        } else {
            Self::Retry(body)
        }
    }

    /// HTTP status code carrying this answer
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Accepted => 204,
            Self::Rejected(_) => 400,
            Self::Retry(_) => 500,
        }
    }

    /// Whether the delivery system should consider the message handled
    pub fn is_acknowledged(&self) -> bool {
        !matches!(self, Self::Retry(_))
    }

    /// Error body, if the answer carries one
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Accepted => None,
            Self::Rejected(body) | Self::Retry(body) => Some(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PublishError, StoreError};
    use test_case::test_case;

    fn doc1() -> DocumentId {
        DocumentId::new("doc1").unwrap()
    }

    fn skipped(reason: SkipReason) -> ProcessingOutcome {
        ProcessingOutcome::Skipped {
            document_id: doc1(),
            reason,
        }
    }

    #[test_case(SkipReason::NotFound, IneligiblePolicy::Acknowledge, 204; "not found acknowledged")]
    #[test_case(SkipReason::NotFound, IneligiblePolicy::Reject, 204; "not found always acknowledged")]
    #[test_case(SkipReason::InvalidState(RecordStatus::Processed), IneligiblePolicy::Acknowledge, 204; "processed acknowledged")]
    #[test_case(SkipReason::InvalidState(RecordStatus::Processed), IneligiblePolicy::Reject, 400; "processed rejected")]
    #[test_case(SkipReason::MissingContent, IneligiblePolicy::Acknowledge, 204; "missing content acknowledged")]
    #[test_case(SkipReason::MissingContent, IneligiblePolicy::Reject, 400; "missing content rejected")]
    fn test_skip_acknowledgment(reason: SkipReason, policy: IneligiblePolicy, status: u16) {
        let ack = Acknowledgment::for_outcome(&skipped(reason), policy);
        assert_eq!(ack.status_code(), status);
        assert!(ack.is_acknowledged());
    }

    #[test]
    fn test_rejected_skip_body() {
        let ack = Acknowledgment::for_outcome(
            &skipped(SkipReason::InvalidState(RecordStatus::Processed)),
            IneligiblePolicy::Reject,
        );
        let body = ack.body().unwrap();
        assert_eq!(body.error, "invalid_state");
        assert_eq!(body.message, "doc1: record is processed, expected queued");
    }

    #[test]
    fn test_committed_is_accepted() {
        let outcome = ProcessingOutcome::Committed {
            document_id: doc1(),
            message_id: "m-1".to_string(),
        };
        assert_eq!(
            Acknowledgment::for_outcome(&outcome, IneligiblePolicy::Reject),
            Acknowledgment::Accepted
        );
    }

    #[test_case(CuratorError::MalformedEnvelope("bad".into()), 400; "malformed envelope")]
    #[test_case(CuratorError::Validation("documentId missing".into()), 400; "validation")]
    #[test_case(StoreError::Unavailable("down".into()).into(), 500; "store unavailable")]
    #[test_case(StoreError::Conflict("race".into()).into(), 500; "store conflict")]
    #[test_case(PublishError::Timeout(30).into(), 500; "publish timeout")]
    #[test_case(CuratorError::Unexpected("boom".into()), 500; "unexpected")]
    fn test_error_acknowledgment(err: CuratorError, status: u16) {
        let ack = Acknowledgment::for_error(&err);
        assert_eq!(ack.status_code(), status);
        assert_eq!(ack.body().unwrap().error, err.kind());
    }

    #[test]
    fn test_skip_reason_from_error() {
        let err = CuratorError::InvalidState {
            document_id: "doc1".to_string(),
            status: RecordStatus::Processing,
        };
        assert_eq!(
            SkipReason::from_error(&err),
            Some(SkipReason::InvalidState(RecordStatus::Processing))
        );
        assert_eq!(
            SkipReason::from_error(&CuratorError::Validation("x".into())),
            None
        );
    }
}
