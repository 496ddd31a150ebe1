//! Google Cloud Pub/Sub integration
//!
//! Publishes processed-document notifications over the REST API.

pub mod auth;
pub mod client;
pub mod models;

pub use auth::{MetadataTokenSource, TokenProvider, METADATA_TOKEN_URL};
pub use client::PubSubNotifier;
