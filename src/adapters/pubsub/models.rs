//! Pub/Sub REST wire types
//!
//! Only the subset of `projects.topics.publish` this service uses.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `POST .../topics/{topic}:publish`
#[derive(Debug, Clone, Serialize)]
pub struct PublishRequest {
    pub messages: Vec<PubsubMessage>,
}

impl PublishRequest {
    /// A request carrying one message with the given payload
    pub fn single(payload: &[u8]) -> Self {
        Self {
            messages: vec![PubsubMessage::new(payload)],
        }
    }
}

/// One outgoing message; `data` is base64 encoded
#[derive(Debug, Clone, Serialize)]
pub struct PubsubMessage {
    pub data: String,

    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

impl PubsubMessage {
    /// Encode `payload` as message data
    pub fn new(payload: &[u8]) -> Self {
        Self {
            data: general_purpose::STANDARD.encode(payload),
            attributes: HashMap::new(),
        }
    }
}

/// Successful publish response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    #[serde(default)]
    pub message_ids: Vec<String>,
}

/// Google API error envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}
