//! Staged article record model
//!
//! A [`Record`] is one unit of work: an article created upstream in status
//! `queued`, advanced to `processed` by this service, and never deleted here.

use crate::domain::ids::{BatchId, DocumentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Processing status of a record
///
/// Transition rules live in [`crate::core::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Created upstream and waiting for this stage
    Queued,
    /// Being processed inside a transaction
    Processing,
    /// Derived fields written and handed to the next stage
    Processed,
}

impl RecordStatus {
    /// The string persisted for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Processed => "processed",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(Self::Queued),
            "processing" => Ok(Self::Processing),
            "processed" => Ok(Self::Processed),
            _ => Err(format!("Invalid record status: {s}")),
        }
    }
}

/// Annotation fields computed from a record's raw text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFields {
    /// Topical categories
    pub categories: Vec<String>,

    /// Free-form tags
    pub tags: Vec<String>,
}

/// A staged article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Immutable document identifier
    pub id: DocumentId,

    /// Current processing status
    pub status: RecordStatus,

    /// Article text to analyze
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    /// Analysis output, absent until processed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_fields: Option<DerivedFields>,

    /// Batch the record was processed in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<BatchId>,

    /// Server-assigned time of the last write
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Creates a queued record, as the upstream stage would
    pub fn queued(id: DocumentId, raw_text: impl Into<String>) -> Self {
        Self {
            id,
            status: RecordStatus::Queued,
            raw_text: Some(raw_text.into()),
            derived_fields: None,
            batch_id: None,
            updated_at: Utc::now(),
        }
    }

    /// Raw text if present and non-empty
    pub fn content(&self) -> Option<&str> {
        self.raw_text.as_deref().filter(|text| !text.is_empty())
    }

    /// Applies a partial update, stamping `updated_at` with the given server time
    pub fn apply(&mut self, update: &RecordUpdate, server_time: DateTime<Utc>) {
        self.status = update.status;
        if let Some(fields) = &update.derived_fields {
            self.derived_fields = Some(fields.clone());
        }
        if let Some(batch_id) = &update.batch_id {
            self.batch_id = Some(batch_id.clone());
        }
        self.updated_at = server_time;
    }
}

/// Partial record write issued inside a transaction
///
/// `None` fields are left unchanged. The store assigns `updated_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordUpdate {
    /// New status
    pub status: RecordStatus,

    /// Derived fields to set
    pub derived_fields: Option<DerivedFields>,

    /// Batch id to set
    pub batch_id: Option<BatchId>,
}

impl RecordUpdate {
    /// An update that only moves the status
    pub fn status(status: RecordStatus) -> Self {
        Self {
            status,
            derived_fields: None,
            batch_id: None,
        }
    }

    /// The final write of a successful processing transaction
    pub fn processed(derived_fields: DerivedFields, batch_id: BatchId) -> Self {
        Self {
            status: RecordStatus::Processed,
            derived_fields: Some(derived_fields),
            batch_id: Some(batch_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> DocumentId {
        DocumentId::new(id).unwrap()
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            RecordStatus::Queued,
            RecordStatus::Processing,
            RecordStatus::Processed,
        ] {
            assert_eq!(status.as_str().parse::<RecordStatus>().unwrap(), status);
        }
        assert!("done".parse::<RecordStatus>().is_err());
    }

    #[test]
    fn test_content_treats_empty_as_missing() {
        let mut record = Record::queued(doc("doc1"), "");
        assert_eq!(record.content(), None);
        record.raw_text = None;
        assert_eq!(record.content(), None);
        record.raw_text = Some("hello".to_string());
        assert_eq!(record.content(), Some("hello"));
    }

    #[test]
    fn test_apply_leaves_unset_fields_alone() {
        let mut record = Record::queued(doc("doc1"), "hello");
        let stamp = Utc::now();

        record.apply(&RecordUpdate::status(RecordStatus::Processing), stamp);
        assert_eq!(record.status, RecordStatus::Processing);
        assert!(record.derived_fields.is_none());
        assert!(record.batch_id.is_none());
        assert_eq!(record.updated_at, stamp);

        let fields = DerivedFields {
            categories: vec!["unclassified".to_string()],
            tags: vec![],
        };
        record.apply(
            &RecordUpdate::processed(fields.clone(), BatchId::new("b1")),
            stamp,
        );
        assert_eq!(record.status, RecordStatus::Processed);
        assert_eq!(record.derived_fields, Some(fields));
        assert_eq!(record.batch_id, Some(BatchId::new("b1")));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = Record::queued(doc("doc1"), "hello AI world");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "queued");
        assert_eq!(json["rawText"], "hello AI world");
        assert!(json.get("derivedFields").is_none());
    }
}
