//! End-to-end processing scenarios against the in-memory backends

use base64::{engine::general_purpose, Engine as _};
use curator::adapters::memory::{MemoryNotifier, MemoryRecordStore};
use curator::adapters::store::RecordStore;
use curator::config::IneligiblePolicy;
use curator::core::analysis::StubAnalyzer;
use curator::core::processing::{
    Acknowledgment, ProcessingOrchestrator, ProcessingOutcome, ProcessingSettings, SkipReason,
};
use curator::domain::{
    BatchId, CuratorError, DerivedFields, DocumentId, OutboundMessage, Record, RecordStatus,
    TaskMessage, TopicId,
};
use std::sync::Arc;

struct Pipeline {
    store: MemoryRecordStore,
    notifier: MemoryNotifier,
    orchestrator: Arc<ProcessingOrchestrator>,
}

fn pipeline_with(policy: IneligiblePolicy) -> Pipeline {
    let store = MemoryRecordStore::new();
    let notifier = MemoryNotifier::new();
    let mut settings = ProcessingSettings::new(TopicId::new("integrate-article").unwrap());
    settings.ineligible_policy = policy;

    let orchestrator = ProcessingOrchestrator::new(
        Arc::new(store.clone()),
        Arc::new(notifier.clone()),
        Arc::new(StubAnalyzer),
        settings,
    );
    Pipeline {
        store,
        notifier,
        orchestrator: Arc::new(orchestrator),
    }
}

fn pipeline() -> Pipeline {
    pipeline_with(IneligiblePolicy::Acknowledge)
}

fn doc(id: &str) -> DocumentId {
    DocumentId::new(id).unwrap()
}

fn envelope(payload: &str) -> Vec<u8> {
    let data = general_purpose::STANDARD.encode(payload);
    serde_json::json!({
        "message": {
            "data": data,
            "messageId": "m-1",
            "attributes": {}
        },
        "subscription": "projects/p/subscriptions/s"
    })
    .to_string()
    .into_bytes()
}

#[tokio::test]
async fn test_queued_record_is_processed_and_announced() {
    let p = pipeline();
    p.store
        .insert(Record::queued(doc("doc1"), "Large language models"))
        .await;

    let ack = p
        .orchestrator
        .handle_delivery(&envelope(r#"{"documentId":"doc1"}"#))
        .await;
    assert_eq!(ack, Acknowledgment::Accepted);
    assert_eq!(ack.status_code(), 204);

    let record = p.store.get(&doc("doc1")).await.unwrap().unwrap();
    assert_eq!(record.status, RecordStatus::Processed);
    assert_eq!(record.batch_id, Some(BatchId::unknown()));
    assert_eq!(
        record.derived_fields,
        Some(DerivedFields {
            categories: vec!["unclassified".to_string()],
            tags: vec!["analyzed".to_string(), "chars_21".to_string()],
        })
    );

    let published = p.notifier.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].topic.as_str(), "integrate-article");
    assert_eq!(
        String::from_utf8(published[0].payload.clone()).unwrap(),
        r#"{"documentId":"doc1","batchId":"unknown"}"#
    );
}

#[tokio::test]
async fn test_batch_id_is_carried_through() {
    let p = pipeline();
    p.store.insert(Record::queued(doc("doc2"), "text")).await;

    let ack = p
        .orchestrator
        .handle_delivery(&envelope(r#"{"documentId":"doc2","batchId":"batch-7"}"#))
        .await;
    assert!(ack.is_acknowledged());

    let record = p.store.get(&doc("doc2")).await.unwrap().unwrap();
    assert_eq!(record.batch_id, Some(BatchId::new("batch-7")));
    assert_eq!(
        p.notifier.outbound_messages(),
        vec![OutboundMessage::new(doc("doc2"), BatchId::new("batch-7"))]
    );
}

#[tokio::test]
async fn test_absent_record_is_acknowledged_without_writes() {
    for policy in [IneligiblePolicy::Acknowledge, IneligiblePolicy::Reject] {
        let p = pipeline_with(policy);

        let ack = p
            .orchestrator
            .handle_delivery(&envelope(r#"{"documentId":"ghost"}"#))
            .await;

        assert_eq!(ack.status_code(), 204);
        assert_eq!(p.store.commit_count(), 0);
        assert!(p.notifier.published().is_empty());
    }
}

#[tokio::test]
async fn test_malformed_payload_never_reaches_the_store() {
    let p = pipeline();
    // Any store access would fail with a retryable error
    p.store.set_available(false);

    let body = br#"{"message":{"data":"%%%not-base64%%%"}}"#;
    let ack = p.orchestrator.handle_delivery(body).await;

    assert_eq!(ack.status_code(), 400);
    assert_eq!(ack.body().unwrap().error, "malformed_envelope");
    assert!(p.notifier.published().is_empty());
}

#[tokio::test]
async fn test_missing_document_id_is_rejected() {
    let p = pipeline();
    p.store.set_available(false);

    let ack = p
        .orchestrator
        .handle_delivery(&envelope(r#"{"batchId":"b"}"#))
        .await;

    assert_eq!(ack.status_code(), 400);
    assert_eq!(ack.body().unwrap().error, "validation_error");
}

#[tokio::test]
async fn test_publish_failure_after_commit_keeps_record_processed() {
    let p = pipeline();
    p.store.insert(Record::queued(doc("doc1"), "text")).await;
    p.notifier.set_failure(Some("topic unavailable"));

    let body = envelope(r#"{"documentId":"doc1"}"#);
    let ack = p.orchestrator.handle_delivery(&body).await;
    assert_eq!(ack.status_code(), 500);
    assert_eq!(ack.body().unwrap().error, "publish_failure");

    let record = p.store.get(&doc("doc1")).await.unwrap().unwrap();
    assert_eq!(record.status, RecordStatus::Processed);

    // Redelivery finds the record already processed
    p.notifier.set_failure(None);
    let task = TaskMessage::new(doc("doc1"), BatchId::unknown());
    let err = p.orchestrator.process(&task).await.unwrap_err();
    assert!(matches!(
        err,
        CuratorError::InvalidState {
            status: RecordStatus::Processed,
            ..
        }
    ));

    let ack = p.orchestrator.handle_delivery(&body).await;
    assert_eq!(ack, Acknowledgment::Accepted);
    assert!(p.notifier.published().is_empty());
}

#[tokio::test]
async fn test_store_outage_asks_for_redelivery() {
    let p = pipeline();
    p.store.insert(Record::queued(doc("doc1"), "text")).await;
    p.store.set_fail_commits(true);

    let ack = p
        .orchestrator
        .handle_delivery(&envelope(r#"{"documentId":"doc1"}"#))
        .await;

    assert_eq!(ack.status_code(), 500);
    assert!(!ack.is_acknowledged());
    assert!(p.notifier.published().is_empty());

    p.store.set_fail_commits(false);
    let record = p.store.get(&doc("doc1")).await.unwrap().unwrap();
    assert_eq!(record.status, RecordStatus::Queued);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deliveries_commit_once() {
    let p = pipeline();
    p.store.insert(Record::queued(doc("doc1"), "text")).await;
    let task = TaskMessage::new(doc("doc1"), BatchId::new("b-1"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let orchestrator = Arc::clone(&p.orchestrator);
            let task = task.clone();
            tokio::spawn(async move { orchestrator.process_task(&task).await })
        })
        .collect();

    let mut committed = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            ProcessingOutcome::Committed { .. } => committed += 1,
            ProcessingOutcome::Skipped { reason, .. } => {
                assert_eq!(reason, SkipReason::InvalidState(RecordStatus::Processed));
            }
        }
    }

    assert_eq!(committed, 1);
    assert_eq!(p.store.commit_count(), 1);
    assert_eq!(p.notifier.published().len(), 1);
}

#[tokio::test]
async fn test_record_without_text_is_skipped_without_writes() {
    let p = pipeline();
    let mut record = Record::queued(doc("doc1"), "");
    record.raw_text = None;
    p.store.insert(record).await;

    let task = TaskMessage::new(doc("doc1"), BatchId::unknown());
    let outcome = p.orchestrator.process_task(&task).await.unwrap();
    assert_eq!(
        outcome,
        ProcessingOutcome::Skipped {
            document_id: doc("doc1"),
            reason: SkipReason::MissingContent,
        }
    );
    assert_eq!(p.store.commit_count(), 0);
    assert!(p.notifier.published().is_empty());

    let stored = p.store.get(&doc("doc1")).await.unwrap().unwrap();
    assert_eq!(stored.status, RecordStatus::Queued);
}

#[tokio::test]
async fn test_reject_policy_answers_ineligible_records_with_400() {
    let p = pipeline_with(IneligiblePolicy::Reject);
    p.store.insert(Record::queued(doc("doc1"), "text")).await;

    let body = envelope(r#"{"documentId":"doc1"}"#);
    assert_eq!(p.orchestrator.handle_delivery(&body).await.status_code(), 204);

    let ack = p.orchestrator.handle_delivery(&body).await;
    assert_eq!(ack.status_code(), 400);
    assert_eq!(ack.body().unwrap().error, "invalid_state");
    assert_eq!(p.notifier.published().len(), 1);
}

#[tokio::test]
async fn test_processed_record_round_trips_through_json() {
    let p = pipeline();
    p.store.insert(Record::queued(doc("doc1"), "text")).await;
    p.orchestrator
        .process(&TaskMessage::new(doc("doc1"), BatchId::new("b")))
        .await
        .unwrap();

    let record = p.store.get(&doc("doc1")).await.unwrap().unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["status"], "processed");
    assert_eq!(json["batchId"], "b");

    let parsed: Record = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, record);
}
