//! Record store abstraction traits
//!
//! This module defines the traits that record store adapters must implement.
//! A store hands out [`RecordTransaction`]s; everything read through a
//! transaction is a snapshot, and its writes become visible together at
//! commit or not at all.

use crate::domain::{DocumentId, Record, RecordUpdate, Result};
use async_trait::async_trait;

/// Transactional document store keyed by document id
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read a record outside any transaction
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(Record))` if found, `Ok(None)` if not found.
    async fn get(&self, id: &DocumentId) -> Result<Option<Record>>;

    /// Open a new transaction
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::StoreError::Unavailable`] if the store can't be reached.
    async fn begin(&self) -> Result<Box<dyn RecordTransaction>>;

    /// Cheap round-trip used by the health probe
    async fn ping(&self) -> Result<()>;

    /// Create backing tables if the backend needs them
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    /// Human-readable backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// An open store transaction
///
/// Transactions must be finished with [`commit`](Self::commit) or
/// [`rollback`](Self::rollback). Dropping one unfinished discards its writes.
#[async_trait]
pub trait RecordTransaction: Send {
    /// Read a record inside the transaction
    async fn get(&mut self, id: &DocumentId) -> Result<Option<Record>>;

    /// Stage a partial update; the store assigns `updated_at`
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::CuratorError::NotFound`] if the record doesn't exist.
    async fn update(&mut self, id: &DocumentId, update: RecordUpdate) -> Result<()>;

    /// Atomically apply every staged write
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::StoreError::Conflict`] if a concurrent writer
    /// changed something this transaction read.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discard every staged write
    async fn rollback(self: Box<Self>) -> Result<()>;
}
