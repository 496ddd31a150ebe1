//! Record status machine
//!
//! ```text
//! queued ──► processing ──► processed
//! ```
//!
//! `queued` is the only status eligible for processing. `processing` exists
//! only inside an uncommitted transaction, and `processed` is terminal for
//! this service. Every transition site matches on [`RecordStatus`]
//! exhaustively so a new status can't slip through unnoticed.

use crate::domain::{CuratorError, DocumentId, Record, RecordStatus, Result};

/// Returns true if a record may move from `from` to `to`
pub fn can_transition(from: RecordStatus, to: RecordStatus) -> bool {
    match from {
        RecordStatus::Queued => to == RecordStatus::Processing,
        RecordStatus::Processing => to == RecordStatus::Processed,
        RecordStatus::Processed => false,
    }
}

/// Checks a transition, reporting the current status on failure
pub fn ensure_transition(record: &Record, to: RecordStatus) -> Result<()> {
    if can_transition(record.status, to) {
        Ok(())
    } else {
        Err(CuratorError::InvalidState {
            document_id: record.id.to_string(),
            status: record.status,
        })
    }
}

/// Validates that a snapshot read inside a transaction may be processed
///
/// # Errors
///
/// - [`CuratorError::NotFound`] if no record exists
/// - [`CuratorError::InvalidState`] if the record is not `queued`
/// - [`CuratorError::MissingContent`] if its raw text is absent or empty
pub fn validate_for_processing<'a>(
    document_id: &DocumentId,
    record: Option<&'a Record>,
) -> Result<&'a Record> {
    let record = record.ok_or_else(|| CuratorError::NotFound(document_id.to_string()))?;

    match record.status {
        RecordStatus::Queued => {}
        RecordStatus::Processing | RecordStatus::Processed => {
            return Err(CuratorError::InvalidState {
                document_id: document_id.to_string(),
                status: record.status,
            });
        }
    }

    if record.content().is_none() {
        return Err(CuratorError::MissingContent(document_id.to_string()));
    }

    Ok(record)
}
