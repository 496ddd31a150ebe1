//! Notifier factory
//!
//! Builds the publisher selected by `publisher.target`.

use crate::adapters::memory::MemoryNotifier;
use crate::adapters::publisher::traits::Notifier;
use crate::adapters::pubsub::PubSubNotifier;
use crate::config::schema::{PublisherConfig, PublisherTarget};
use crate::domain::Result;
use std::sync::Arc;

/// Create a notifier based on the configuration
///
/// # Errors
///
/// Returns an error if the selected backend cannot be built.
pub fn create_notifier(config: &PublisherConfig) -> Result<Arc<dyn Notifier>> {
    match config.target {
        PublisherTarget::Log => {
            tracing::info!(topic = %config.topic_id, "Publishing to log only");
            Ok(Arc::new(MemoryNotifier::new()))
        }
        PublisherTarget::PubSub => {
            tracing::info!(
                project = %config.project_id,
                topic = %config.topic_id,
                endpoint = %config.endpoint,
                "Creating Pub/Sub publisher"
            );
            Ok(Arc::new(PubSubNotifier::new(config)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_target_is_default() {
        let notifier = create_notifier(&PublisherConfig::default()).unwrap();
        assert_eq!(notifier.backend_name(), "log");
    }

    #[test]
    fn test_pubsub_target() {
        let config = PublisherConfig {
            target: PublisherTarget::PubSub,
            project_id: "memory-library".to_string(),
            ..Default::default()
        };
        let notifier = create_notifier(&config).unwrap();
        assert_eq!(notifier.backend_name(), "pubsub");
    }
}
