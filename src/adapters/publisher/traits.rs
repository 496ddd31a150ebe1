//! Notifier abstraction
//!
//! A notifier is an at-least-once publisher. `publish` resolves once the
//! backend has durably accepted the message; [`publish_and_wait`] bounds how
//! long the caller is willing to wait for that confirmation.

use crate::domain::{PublishError, Result, TopicId};
use async_trait::async_trait;
use std::time::Duration;

/// At-least-once message publisher keyed by destination topic
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publish `payload` to `topic` and wait for the backend to accept it
    ///
    /// # Returns
    ///
    /// The backend-assigned message id.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Failed`] or [`PublishError::Rejected`] if the
    /// message was not accepted.
    async fn publish(&self, topic: &TopicId, payload: Vec<u8>) -> Result<String>;

    /// Human-readable backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Publish and wait at most `timeout` for the confirmation
///
/// A timeout does not withdraw the message: the backend may still deliver it.
///
/// # Errors
///
/// Returns [`PublishError::Timeout`] if no confirmation arrives in time, or
/// the error reported by the notifier.
pub async fn publish_and_wait(
    notifier: &dyn Notifier,
    topic: &TopicId,
    payload: Vec<u8>,
    timeout: Duration,
) -> Result<String> {
    match tokio::time::timeout(timeout, notifier.publish(topic, payload)).await {
        Ok(result) => result,
        Err(_) => Err(PublishError::Timeout(timeout.as_secs()).into()),
    }
}
