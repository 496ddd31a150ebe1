//! In-process record store
//!
//! Keeps records in a map guarded by a tokio `RwLock`. Transactions use
//! optimistic concurrency: every read remembers the version it saw, writes
//! are staged privately, and commit fails with [`StoreError::Conflict`] if
//! any read version changed in the meantime. Staged writes are never
//! visible to other transactions.

use crate::adapters::store::traits::{RecordStore, RecordTransaction};
use crate::domain::{CuratorError, DocumentId, Record, RecordUpdate, Result, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Versioned {
    record: Record,
    version: u64,
}

#[derive(Debug, Default)]
struct Shared {
    records: RwLock<HashMap<DocumentId, Versioned>>,
    commits: AtomicUsize,
    unavailable: AtomicBool,
    fail_commits: AtomicBool,
}

impl Shared {
    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(
                StoreError::Unavailable("memory store marked unavailable".to_string()).into(),
            );
        }
        Ok(())
    }
}

/// Transactional in-memory record store
///
/// Cloning is cheap and clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    shared: Arc<Shared>,
}

impl MemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record, as an upstream stage would
    pub async fn insert(&self, record: Record) {
        let mut records = self.shared.records.write().await;
        let version = records.get(&record.id).map_or(1, |v| v.version + 1);
        records.insert(record.id.clone(), Versioned { record, version });
    }

    /// Number of committed transactions that wrote at least one record
    pub fn commit_count(&self) -> usize {
        self.shared.commits.load(Ordering::SeqCst)
    }

    /// Simulate an outage: every operation fails with `StoreError::Unavailable`
    pub fn set_available(&self, available: bool) {
        self.shared.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Make every commit fail with `StoreError::Unavailable`
    pub fn set_fail_commits(&self, fail: bool) {
        self.shared.fail_commits.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, id: &DocumentId) -> Result<Option<Record>> {
        self.shared.check_available()?;
        let records = self.shared.records.read().await;
        Ok(records.get(id).map(|v| v.record.clone()))
    }

    async fn begin(&self) -> Result<Box<dyn RecordTransaction>> {
        self.shared.check_available()?;
        let tx = MemoryTransaction {
            id: Uuid::new_v4(),
            shared: Arc::clone(&self.shared),
            reads: HashMap::new(),
            writes: HashMap::new(),
        };
        tracing::trace!(transaction_id = %tx.id, "Memory transaction started");
        Ok(Box::new(tx))
    }

    async fn ping(&self) -> Result<()> {
        self.shared.check_available()
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Transaction over a [`MemoryRecordStore`]
pub struct MemoryTransaction {
    id: Uuid,
    shared: Arc<Shared>,
    /// Version observed for each id read; `None` means it was absent
    reads: HashMap<DocumentId, Option<u64>>,
    /// Staged records, visible only to this transaction
    writes: HashMap<DocumentId, Record>,
}

impl MemoryTransaction {
    async fn current(&mut self, id: &DocumentId) -> Result<Option<Record>> {
        if let Some(staged) = self.writes.get(id) {
            return Ok(Some(staged.clone()));
        }

        let records = self.shared.records.read().await;
        let entry = records.get(id);
        self.reads
            .entry(id.clone())
            .or_insert_with(|| entry.map(|v| v.version));
        Ok(entry.map(|v| v.record.clone()))
    }
}

#[async_trait]
impl RecordTransaction for MemoryTransaction {
    async fn get(&mut self, id: &DocumentId) -> Result<Option<Record>> {
        self.shared.check_available()?;
        self.current(id).await
    }

    async fn update(&mut self, id: &DocumentId, update: RecordUpdate) -> Result<()> {
        self.shared.check_available()?;
        let mut record = self
            .current(id)
            .await?
            .ok_or_else(|| CuratorError::NotFound(id.to_string()))?;
        record.apply(&update, Utc::now());
        self.writes.insert(id.clone(), record);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTransaction {
            id: transaction_id,
            shared,
            reads,
            writes,
        } = *self;

        shared.check_available()?;
        if shared.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("commit failed".to_string()).into());
        }

        let mut records = shared.records.write().await;

        for (id, seen) in &reads {
            let current = records.get(id).map(|v| v.version);
            if current != *seen {
                tracing::debug!(
                    transaction_id = %transaction_id,
                    document_id = %id,
                    "Memory transaction conflict"
                );
                return Err(StoreError::Conflict(format!(
                    "document {id} was modified by a concurrent transaction"
                ))
                .into());
            }
        }

        if writes.is_empty() {
            return Ok(());
        }

        let server_time = Utc::now();
        for (id, mut record) in writes {
            record.updated_at = server_time;
            let version = records.get(&id).map_or(1, |v| v.version + 1);
            records.insert(id, Versioned { record, version });
        }
        shared.commits.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(transaction_id = %transaction_id, "Memory transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        tracing::trace!(
            transaction_id = %self.id,
            discarded = self.writes.len(),
            "Memory transaction rolled back"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordStatus;

    fn doc1() -> DocumentId {
        DocumentId::new("doc1").unwrap()
    }

    #[tokio::test]
    async fn test_staged_writes_are_isolated() {
        let store = MemoryRecordStore::new();
        store.insert(Record::queued(doc1(), "hello")).await;

        let mut tx = store.begin().await.unwrap();
        tx.update(&doc1(), RecordUpdate::status(RecordStatus::Processing))
            .await
            .unwrap();

        // Visible inside the transaction only
        let inside = tx.get(&doc1()).await.unwrap().unwrap();
        assert_eq!(inside.status, RecordStatus::Processing);
        let outside = store.get(&doc1()).await.unwrap().unwrap();
        assert_eq!(outside.status, RecordStatus::Queued);

        tx.commit().await.unwrap();
        let after = store.get(&doc1()).await.unwrap().unwrap();
        assert_eq!(after.status, RecordStatus::Processing);
        assert_eq!(store.commit_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_writers_conflict() {
        let store = MemoryRecordStore::new();
        store.insert(Record::queued(doc1(), "hello")).await;

        let mut first = store.begin().await.unwrap();
        let mut second = store.begin().await.unwrap();
        assert!(first.get(&doc1()).await.unwrap().is_some());
        assert!(second.get(&doc1()).await.unwrap().is_some());

        first
            .update(&doc1(), RecordUpdate::status(RecordStatus::Processing))
            .await
            .unwrap();
        second
            .update(&doc1(), RecordUpdate::status(RecordStatus::Processing))
            .await
            .unwrap();

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();
        assert!(matches!(err, CuratorError::Store(StoreError::Conflict(_))));
        assert_eq!(store.commit_count(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let store = MemoryRecordStore::new();
        let mut tx = store.begin().await.unwrap();
        let err = tx
            .update(&doc1(), RecordUpdate::status(RecordStatus::Processing))
            .await
            .unwrap_err();
        assert!(matches!(err, CuratorError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let store = MemoryRecordStore::new();
        store.set_available(false);
        assert!(store.ping().await.is_err());
        assert!(store.begin().await.is_err());

        store.set_available(true);
        assert!(store.ping().await.is_ok());
    }
}
