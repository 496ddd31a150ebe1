//! Processing orchestrator
//!
//! Moves one record from `queued` to `processed` inside a single store
//! transaction, then announces it downstream. The publish happens strictly
//! after the commit: a message goes out if and only if the transition is
//! durable. A publish failure after commit is returned to the caller but
//! never rolled back.

use super::outcome::{Acknowledgment, ProcessingOutcome, SkipReason};
use crate::adapters::publisher::{publish_and_wait, Notifier};
use crate::adapters::store::{run_transaction, RecordStore, RecordTransaction};
use crate::config::{CuratorConfig, IneligiblePolicy};
use crate::core::analysis::DerivedFieldComputer;
use crate::core::ingest::{MessageDecoder, PushEnvelope};
use crate::core::lifecycle::{ensure_transition, validate_for_processing};
use crate::domain::{
    CuratorError, OutboundMessage, RecordStatus, RecordUpdate, Result, TaskMessage, TopicId,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Tunables for the orchestrator
#[derive(Debug, Clone)]
pub struct ProcessingSettings {
    /// Downstream topic for processed-document notifications
    pub topic: TopicId,

    /// How to answer deliveries for ineligible records
    pub ineligible_policy: IneligiblePolicy,

    /// Upper bound on waiting for publish confirmation
    pub publish_timeout: Duration,

    /// Attempts for a transaction that keeps conflicting
    pub max_transaction_attempts: u32,

    /// Accept bare document ids as payloads
    pub accept_legacy_plain_id: bool,
}

impl ProcessingSettings {
    /// Settings for `topic` with default tunables
    pub fn new(topic: TopicId) -> Self {
        Self {
            topic,
            ineligible_policy: IneligiblePolicy::default(),
            publish_timeout: Duration::from_secs(30),
            max_transaction_attempts: 5,
            accept_legacy_plain_id: false,
        }
    }

    /// Read settings from the validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`CuratorError::Configuration`] if the topic id is invalid.
    pub fn from_config(config: &CuratorConfig) -> Result<Self> {
        let topic = TopicId::new(config.publisher.topic_id.as_str()).map_err(|e| {
            CuratorError::Configuration(format!("Invalid publisher.topic_id: {e}"))
        })?;

        Ok(Self {
            topic,
            ineligible_policy: config.processing.ineligible_policy,
            publish_timeout: config.processing.publish_timeout(),
            max_transaction_attempts: config.store.max_transaction_attempts,
            accept_legacy_plain_id: config.processing.accept_legacy_plain_id,
        })
    }
}

/// Coordinates decoding, the record transition and the downstream publish
///
/// Collaborators are injected once at startup and shared by every request.
pub struct ProcessingOrchestrator {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    computer: Arc<dyn DerivedFieldComputer>,
    decoder: MessageDecoder,
    settings: ProcessingSettings,
}

impl ProcessingOrchestrator {
    /// Create an orchestrator
    pub fn new(
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn Notifier>,
        computer: Arc<dyn DerivedFieldComputer>,
        settings: ProcessingSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            computer,
            decoder: MessageDecoder::new(settings.accept_legacy_plain_id),
            settings,
        }
    }

    /// The record store, shared with the health probe
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Current settings
    pub fn settings(&self) -> &ProcessingSettings {
        &self.settings
    }

    /// Process one task message
    ///
    /// Runs the read-validate-write sequence in one transaction, then
    /// publishes the outbound message and waits for its confirmation.
    ///
    /// # Errors
    ///
    /// - [`CuratorError::NotFound`], [`CuratorError::InvalidState`] or
    ///   [`CuratorError::MissingContent`] if the record is not eligible; the
    ///   transaction is rolled back and nothing is published
    /// - a store error if the transaction could not be committed; nothing is
    ///   published
    /// - a publish error if the notification was not confirmed; the record
    ///   stays `processed`
    pub async fn process(&self, task: &TaskMessage) -> Result<ProcessingOutcome> {
        let started = Instant::now();
        crate::log_processing_start!(&task.document_id, &task.batch_id);

        let computer = Arc::clone(&self.computer);
        let owned_task = task.clone();
        run_transaction(
            self.store.as_ref(),
            self.settings.max_transaction_attempts,
            move |tx| {
                let computer = Arc::clone(&computer);
                let task = owned_task.clone();
                Box::pin(async move { transition_record(tx, &task, computer.as_ref()).await })
            },
        )
        .await?;

        tracing::debug!(
            document_id = %task.document_id,
            backend = self.store.backend_name(),
            "Record transition committed"
        );

        let payload = OutboundMessage::from(task).to_bytes()?;
        let message_id = publish_and_wait(
            self.notifier.as_ref(),
            &self.settings.topic,
            payload,
            self.settings.publish_timeout,
        )
        .await
        .map_err(|e| {
            tracing::error!(
                document_id = %task.document_id,
                batch_id = %task.batch_id,
                error = %e,
                error_kind = e.kind(),
                topic = %self.settings.topic,
                "Publish failed after commit; record stays processed"
            );
            e
        })?;

        crate::log_processing_complete!(&task.document_id, &message_id, started.elapsed());
        Ok(ProcessingOutcome::Committed {
            document_id: task.document_id.clone(),
            message_id,
        })
    }

    /// Process a task message, folding eligibility errors into a skip
    ///
    /// # Errors
    ///
    /// Store and publish errors, which warrant redelivery.
    pub async fn process_task(&self, task: &TaskMessage) -> Result<ProcessingOutcome> {
        match self.process(task).await {
            Err(err) => match SkipReason::from_error(&err) {
                Some(reason) => {
                    tracing::info!(
                        document_id = %task.document_id,
                        batch_id = %task.batch_id,
                        reason = %reason,
                        error_kind = reason.kind(),
                        "Skipping ineligible record"
                    );
                    Ok(ProcessingOutcome::Skipped {
                        document_id: task.document_id.clone(),
                        reason,
                    })
                }
                None => Err(err),
            },
            other => other,
        }
    }

    /// Handle one push delivery end to end
    ///
    /// Decode failures are answered without touching the store.
    pub async fn handle_delivery(&self, body: &[u8]) -> Acknowledgment {
        let (envelope, task) = match self.decoder.decode_body(body) {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::warn!(error = %err, error_kind = err.kind(), "Rejecting undecodable delivery");
                return Acknowledgment::for_error(&err);
            }
        };

        log_delivery(&envelope, &task);

        match self.process_task(&task).await {
            Ok(outcome) => Acknowledgment::for_outcome(&outcome, self.settings.ineligible_policy),
            Err(err) => {
                tracing::error!(
                    document_id = %task.document_id,
                    batch_id = %task.batch_id,
                    message_id = envelope.message_id().unwrap_or_default(),
                    error = %err,
                    error_kind = err.kind(),
                    retryable = err.is_retryable(),
                    "Delivery failed"
                );
                Acknowledgment::for_error(&err)
            }
        }
    }
}

fn log_delivery(envelope: &PushEnvelope, task: &TaskMessage) {
    let attributes = envelope
        .message
        .as_ref()
        .map(|m| m.attributes.len())
        .unwrap_or_default();

    tracing::debug!(
        document_id = %task.document_id,
        batch_id = %task.batch_id,
        message_id = envelope.message_id().unwrap_or_default(),
        subscription = envelope.subscription.as_deref().unwrap_or_default(),
        attributes,
        "Delivery received"
    );
}

/// Transaction body: validate the snapshot and write both updates
async fn transition_record(
    tx: &mut dyn RecordTransaction,
    task: &TaskMessage,
    computer: &dyn DerivedFieldComputer,
) -> Result<()> {
    let snapshot = tx.get(&task.document_id).await?;
    let record = validate_for_processing(&task.document_id, snapshot.as_ref())?;
    ensure_transition(record, RecordStatus::Processing)?;

    let raw_text = record
        .content()
        .ok_or_else(|| CuratorError::MissingContent(task.document_id.to_string()))?;

    tx.update(
        &task.document_id,
        RecordUpdate::status(RecordStatus::Processing),
    )
    .await?;

    let derived_fields = computer.compute(raw_text);

    tx.update(
        &task.document_id,
        RecordUpdate::processed(derived_fields, task.batch_id.clone()),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryNotifier, MemoryRecordStore};
    use crate::core::analysis::StubAnalyzer;
    use crate::domain::{BatchId, DocumentId, PublishError, Record, StoreError};

    struct Harness {
        store: MemoryRecordStore,
        notifier: MemoryNotifier,
        orchestrator: ProcessingOrchestrator,
    }

    fn harness() -> Harness {
        let store = MemoryRecordStore::new();
        let notifier = MemoryNotifier::new();
        let orchestrator = ProcessingOrchestrator::new(
            Arc::new(store.clone()),
            Arc::new(notifier.clone()),
            Arc::new(StubAnalyzer),
            ProcessingSettings::new(TopicId::new("integrate-article").unwrap()),
        );
        Harness {
            store,
            notifier,
            orchestrator,
        }
    }

    fn doc1() -> DocumentId {
        DocumentId::new("doc1").unwrap()
    }

    fn task() -> TaskMessage {
        TaskMessage::new(doc1(), BatchId::new("b-1"))
    }

    #[tokio::test]
    async fn test_process_commits_then_publishes() {
        let h = harness();
        h.store.insert(Record::queued(doc1(), "hello AI world")).await;

        let outcome = h.orchestrator.process(&task()).await.unwrap();
        assert!(matches!(outcome, ProcessingOutcome::Committed { .. }));

        let record = h.store.get(&doc1()).await.unwrap().unwrap();
        assert_eq!(record.status, RecordStatus::Processed);
        assert_eq!(record.batch_id, Some(BatchId::new("b-1")));
        assert_eq!(
            record.derived_fields.unwrap().tags,
            vec!["analyzed", "chars_14"]
        );
        assert_eq!(h.store.commit_count(), 1);
        assert_eq!(h.notifier.published().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_commit_publishes_nothing() {
        let h = harness();
        h.store.insert(Record::queued(doc1(), "hello")).await;
        h.store.set_fail_commits(true);

        let err = h.orchestrator.process(&task()).await.unwrap_err();
        assert!(matches!(err, CuratorError::Store(StoreError::Unavailable(_))));
        assert!(h.notifier.published().is_empty());

        let record = h.store.get(&doc1()).await.unwrap().unwrap();
        assert_eq!(record.status, RecordStatus::Queued);
    }

    #[tokio::test]
    async fn test_process_task_folds_ineligible_records() {
        let h = harness();
        let outcome = h.orchestrator.process_task(&task()).await.unwrap();
        assert_eq!(
            outcome,
            ProcessingOutcome::Skipped {
                document_id: doc1(),
                reason: SkipReason::NotFound,
            }
        );
    }

    #[tokio::test]
    async fn test_process_task_keeps_publish_errors() {
        let h = harness();
        h.store.insert(Record::queued(doc1(), "hello")).await;
        h.notifier.set_failure(Some("topic deleted"));

        let err = h.orchestrator.process_task(&task()).await.unwrap_err();
        assert!(matches!(err, CuratorError::Publish(PublishError::Failed(_))));
    }

    #[tokio::test]
    async fn test_handle_delivery_rejects_undecodable_body() {
        let h = harness();
        h.store.set_available(false);

        let ack = h.orchestrator.handle_delivery(b"{\"message\":{}}").await;
        assert_eq!(ack.status_code(), 400);
        assert_eq!(ack.body().unwrap().error, "malformed_envelope");
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = CuratorConfig::default();
        config.processing.ineligible_policy = IneligiblePolicy::Reject;
        config.store.max_transaction_attempts = 2;

        let settings = ProcessingSettings::from_config(&config).unwrap();
        assert_eq!(settings.topic.as_str(), "integrate-article");
        assert_eq!(settings.ineligible_policy, IneligiblePolicy::Reject);
        assert_eq!(settings.max_transaction_attempts, 2);
    }
}
