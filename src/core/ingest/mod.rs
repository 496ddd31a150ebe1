//! Inbound delivery decoding
//!
//! Pub/Sub push deliveries arrive as
//! `{"message": {"data": "<base64>", "messageId": "..."}, "subscription": "..."}`.
//! The decoded `data` is a JSON task message `{"documentId": ..., "batchId": ...}`.

pub mod decoder;

pub use decoder::{MessageDecoder, PushEnvelope, PushMessage};
