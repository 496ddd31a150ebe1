//! Push envelope decoder
//!
//! Decoding never touches the store, so every failure here is a permanent
//! client error: [`CuratorError::MalformedEnvelope`] for transport-level
//! problems and [`CuratorError::Validation`] for a task message with the
//! wrong shape.

use crate::domain::{BatchId, CuratorError, DocumentId, Result, TaskMessage};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Delivery wrapper posted by the message queue
#[derive(Debug, Clone, Deserialize)]
pub struct PushEnvelope {
    /// The delivered message
    pub message: Option<PushMessage>,

    /// Subscription that made the delivery
    #[serde(default)]
    pub subscription: Option<String>,
}

/// Message inside a push envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    /// Base64-encoded payload
    #[serde(default)]
    pub data: Option<String>,

    /// Queue-assigned message id
    #[serde(default, alias = "message_id")]
    pub message_id: Option<String>,

    /// Message attributes
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Time the message was published
    #[serde(default, alias = "publish_time")]
    pub publish_time: Option<String>,
}

impl PushEnvelope {
    /// Queue-assigned message id, if the envelope carries one
    pub fn message_id(&self) -> Option<&str> {
        self.message.as_ref()?.message_id.as_deref()
    }
}

/// Decodes push deliveries into task messages
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageDecoder {
    accept_legacy_plain_id: bool,
}

impl MessageDecoder {
    /// Creates a decoder
    ///
    /// # Arguments
    ///
    /// * `accept_legacy_plain_id` - Treat a payload that isn't a JSON object
    ///   as a bare document id, as the first pipeline version published them
    pub fn new(accept_legacy_plain_id: bool) -> Self {
        Self {
            accept_legacy_plain_id,
        }
    }

    /// Parses a raw request body into an envelope
    ///
    /// # Errors
    ///
    /// Returns [`CuratorError::MalformedEnvelope`] if the body is empty, `null`,
    /// or not a JSON envelope.
    pub fn parse_envelope(&self, body: &[u8]) -> Result<PushEnvelope> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(CuratorError::MalformedEnvelope(
                "request body is empty".to_string(),
            ));
        }

        let envelope: Option<PushEnvelope> = serde_json::from_slice(body).map_err(|e| {
            CuratorError::MalformedEnvelope(format!("invalid Pub/Sub message format: {e}"))
        })?;

        envelope.ok_or_else(|| CuratorError::MalformedEnvelope("envelope is absent".to_string()))
    }

    /// Decodes an envelope into a task message
    ///
    /// # Errors
    ///
    /// - [`CuratorError::MalformedEnvelope`] if `message` or `message.data` is
    ///   missing, or the data is not base64-encoded UTF-8 JSON
    /// - [`CuratorError::Validation`] if the task message lacks a usable
    ///   `documentId` or carries a non-string `batchId`
    pub fn decode(&self, envelope: &PushEnvelope) -> Result<TaskMessage> {
        let message = envelope.message.as_ref().ok_or_else(|| {
            CuratorError::MalformedEnvelope("envelope has no 'message' field".to_string())
        })?;
        let data = message.data.as_deref().ok_or_else(|| {
            CuratorError::MalformedEnvelope("message has no 'data' field".to_string())
        })?;

        self.decode_data(data)
    }

    /// Parses and decodes a raw request body in one step
    pub fn decode_body(&self, body: &[u8]) -> Result<(PushEnvelope, TaskMessage)> {
        let envelope = self.parse_envelope(body)?;
        let task = self.decode(&envelope)?;
        Ok((envelope, task))
    }

    fn decode_data(&self, data: &str) -> Result<TaskMessage> {
        let bytes = general_purpose::STANDARD.decode(data.trim())?;
        let text = String::from_utf8(bytes).map_err(|e| {
            CuratorError::MalformedEnvelope(format!("message data is not valid UTF-8: {e}"))
        })?;

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(fields)) => task_from_fields(&fields),
            _ if self.accept_legacy_plain_id => {
                let document_id =
                    DocumentId::new(text.trim()).map_err(CuratorError::Validation)?;
                Ok(TaskMessage::new(document_id, BatchId::unknown()))
            }
            Ok(_) => Err(CuratorError::MalformedEnvelope(
                "message data is not a JSON object".to_string(),
            )),
            Err(e) => Err(CuratorError::MalformedEnvelope(format!(
                "message data is not valid JSON: {e}"
            ))),
        }
    }
}

fn task_from_fields(fields: &Map<String, Value>) -> Result<TaskMessage> {
    let document_id = match fields.get("documentId") {
        None | Some(Value::Null) => {
            return Err(CuratorError::Validation("documentId missing".to_string()))
        }
        Some(Value::String(id)) => DocumentId::new(id.as_str()).map_err(CuratorError::Validation)?,
        Some(_) => {
            return Err(CuratorError::Validation(
                "documentId must be a string".to_string(),
            ))
        }
    };

    let batch_id = match fields.get("batchId") {
        None | Some(Value::Null) => BatchId::unknown(),
        Some(Value::String(id)) => BatchId::new(id.as_str()),
        Some(_) => {
            return Err(CuratorError::Validation(
                "batchId must be a string".to_string(),
            ))
        }
    };

    Ok(TaskMessage::new(document_id, batch_id))
}
