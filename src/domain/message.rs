//! Pipeline messages
//!
//! [`TaskMessage`] is what an inbound delivery decodes to; [`OutboundMessage`]
//! is what this stage publishes for the next one once its transaction commits.

use crate::domain::ids::{BatchId, DocumentId};
use crate::domain::Result;
use serde::{Deserialize, Serialize};

/// A decoded request to process one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMessage {
    /// Document to process
    pub document_id: DocumentId,

    /// Batch correlation id, `"unknown"` when the sender omitted it
    pub batch_id: BatchId,
}

impl TaskMessage {
    /// Creates a task message
    pub fn new(document_id: DocumentId, batch_id: BatchId) -> Self {
        Self {
            document_id,
            batch_id,
        }
    }
}

/// Notification published to the downstream topic
///
/// Wire shape: `{"documentId": string, "batchId": string}` as UTF-8 JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    pub document_id: DocumentId,
    pub batch_id: BatchId,
}

impl OutboundMessage {
    /// Creates an outbound message
    pub fn new(document_id: DocumentId, batch_id: BatchId) -> Self {
        Self {
            document_id,
            batch_id,
        }
    }

    /// Serializes the message to its wire bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl From<&TaskMessage> for OutboundMessage {
    fn from(task: &TaskMessage) -> Self {
        Self::new(task.document_id.clone(), task.batch_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_wire_shape() {
        let message = OutboundMessage::new(DocumentId::new("doc1").unwrap(), BatchId::unknown());
        let bytes = message.to_bytes().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"documentId":"doc1","batchId":"unknown"}"#
        );
    }

    #[test]
    fn test_outbound_from_task() {
        let task = TaskMessage::new(DocumentId::new("doc9").unwrap(), BatchId::new("b2"));
        let message = OutboundMessage::from(&task);
        assert_eq!(message.document_id.as_str(), "doc9");
        assert_eq!(message.batch_id.as_str(), "b2");
    }
}
