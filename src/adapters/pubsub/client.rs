//! Pub/Sub REST publisher
//!
//! Publishes through `POST {endpoint}/v1/projects/{project}/topics/{topic}:publish`.
//! A 2xx answer with a message id means the message is durably accepted.
//! Point `publisher.endpoint` at the emulator for local runs and leave both
//! credential settings unset. See [`super::auth`] for where tokens come from.

use super::auth::TokenProvider;
use super::models::{ErrorResponse, PublishRequest, PublishResponse};
use crate::adapters::publisher::traits::Notifier;
use crate::config::PublisherConfig;
use crate::domain::{CuratorError, PublishError, Result, TopicId};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// [`Notifier`] backed by the Pub/Sub REST API
pub struct PubSubNotifier {
    client: Client,
    endpoint: String,
    project_id: String,
    auth: TokenProvider,
}

impl PubSubNotifier {
    /// Create a publisher from configuration
    ///
    /// # Errors
    ///
    /// Returns [`CuratorError::Configuration`] if the HTTP client can't be built.
    pub fn new(config: &PublisherConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CuratorError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        let auth = TokenProvider::from_config(config, client.clone());
        tracing::debug!(credentials = auth.kind(), "Pub/Sub publisher configured");

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            auth,
        })
    }

    /// Fully qualified topic name
    pub fn topic_path(&self, topic: &TopicId) -> String {
        format!("projects/{}/topics/{}", self.project_id, topic)
    }

    fn publish_url(&self, topic: &TopicId) -> String {
        format!("{}/v1/{}:publish", self.endpoint, self.topic_path(topic))
    }
}

#[async_trait]
impl Notifier for PubSubNotifier {
    async fn publish(&self, topic: &TopicId, payload: Vec<u8>) -> Result<String> {
        let mut request = self
            .client
            .post(self.publish_url(topic))
            .json(&PublishRequest::single(&payload));

        if let Some(token) = self.auth.bearer_token().await? {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| PublishError::Failed(format!("Pub/Sub request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| format!("{} {}", e.error.status, e.error.message).trim().to_string())
                .unwrap_or(body);
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let parsed: PublishResponse = resp
            .json()
            .await
            .map_err(|e| PublishError::Failed(format!("Invalid Pub/Sub response: {e}")))?;

        let message_id = parsed
            .message_ids
            .into_iter()
            .next()
            .ok_or_else(|| PublishError::Failed("Pub/Sub returned no message id".to_string()))?;

        tracing::debug!(
            topic = %self.topic_path(topic),
            message_id = %message_id,
            "Message accepted by Pub/Sub"
        );
        Ok(message_id)
    }

    fn backend_name(&self) -> &'static str {
        "pubsub"
    }
}
