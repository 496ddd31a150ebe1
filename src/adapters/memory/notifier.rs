//! Recording notifier
//!
//! Keeps every published message in memory and logs it. Backs the `log`
//! publisher target and doubles as the notifier in tests, where failures and
//! slow confirmations can be injected.

use crate::adapters::publisher::traits::Notifier;
use crate::domain::{OutboundMessage, PublishError, Result, TopicId};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

/// A message accepted by a [`MemoryNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: TopicId,
    pub payload: Vec<u8>,
    pub message_id: String,
}

#[derive(Debug, Default)]
struct State {
    published: Vec<PublishedMessage>,
    failure: Option<String>,
    delay: Option<Duration>,
}

/// In-memory notifier
///
/// Cloning is cheap and clones share the same message log.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    state: Arc<Mutex<State>>,
}

impl MemoryNotifier {
    /// Create a notifier with an empty log
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every message accepted so far, in publish order
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.lock().published.clone()
    }

    /// Accepted messages decoded as outbound notifications
    ///
    /// Payloads that aren't outbound notifications are skipped.
    pub fn outbound_messages(&self) -> Vec<OutboundMessage> {
        self.lock()
            .published
            .iter()
            .filter_map(|m| serde_json::from_slice(&m.payload).ok())
            .collect()
    }

    /// Make every publish fail with the given reason, or succeed again with `None`
    pub fn set_failure(&self, reason: Option<&str>) {
        self.lock().failure = reason.map(str::to_string);
    }

    /// Delay every confirmation by `delay`
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.lock().delay = delay;
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn publish(&self, topic: &TopicId, payload: Vec<u8>) -> Result<String> {
        let delay = self.lock().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.lock();
        if let Some(reason) = &state.failure {
            return Err(PublishError::Failed(reason.clone()).into());
        }

        let message_id = Uuid::new_v4().to_string();
        tracing::info!(
            topic = %topic,
            message_id = %message_id,
            payload = %String::from_utf8_lossy(&payload),
            "Message published"
        );
        state.published.push(PublishedMessage {
            topic: topic.clone(),
            payload,
            message_id: message_id.clone(),
        });
        Ok(message_id)
    }

    fn backend_name(&self) -> &'static str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BatchId, CuratorError, DocumentId};

    #[tokio::test]
    async fn test_records_messages_in_order() {
        let notifier = MemoryNotifier::new();
        let topic = TopicId::new("integrate-article").unwrap();

        for id in ["doc1", "doc2"] {
            let message = OutboundMessage::new(DocumentId::new(id).unwrap(), BatchId::unknown());
            notifier
                .publish(&topic, message.to_bytes().unwrap())
                .await
                .unwrap();
        }

        let ids: Vec<String> = notifier
            .outbound_messages()
            .into_iter()
            .map(|m| m.document_id.into_inner())
            .collect();
        assert_eq!(ids, vec!["doc1", "doc2"]);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let notifier = MemoryNotifier::new();
        notifier.set_failure(Some("topic deleted"));
        let topic = TopicId::new("integrate-article").unwrap();

        let err = notifier.publish(&topic, b"{}".to_vec()).await.unwrap_err();
        assert!(matches!(err, CuratorError::Publish(PublishError::Failed(_))));
        assert!(notifier.published().is_empty());
    }
}
