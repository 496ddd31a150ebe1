//! Transaction runner
//!
//! [`run_transaction`] is the only way the service writes records. The caller
//! passes a transaction-scoped function that receives the transaction handle
//! and returns a result; the runner commits on `Ok` and rolls back on `Err`.
//! Conflicts are retried here, in the store client layer, so callers never
//! loop on their own.

use super::traits::{RecordStore, RecordTransaction};
use crate::domain::{CuratorError, Result, StoreError};
use futures::future::BoxFuture;

/// Runs `work` inside a store transaction and commits it
///
/// `work` may be invoked more than once: when the commit (or any statement)
/// fails with [`StoreError::Conflict`], the transaction is rolled back and
/// `work` runs again against a fresh snapshot, up to `max_attempts` times in
/// total. Any other error is returned immediately.
///
/// # Errors
///
/// Returns the error produced by `work`, by the store while beginning or
/// committing, or the last conflict once attempts are exhausted.
pub async fn run_transaction<T, F>(
    store: &dyn RecordStore,
    max_attempts: u32,
    work: F,
) -> Result<T>
where
    T: Send,
    F: for<'t> Fn(&'t mut dyn RecordTransaction) -> BoxFuture<'t, Result<T>> + Send + Sync,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let mut tx = store.begin().await?;
        let outcome = work(tx.as_mut()).await;

        let result = match outcome {
            Ok(value) => tx.commit().await.map(|()| value),
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(
                        error = %rollback_err,
                        backend = store.backend_name(),
                        "Rollback failed after aborted transaction"
                    );
                }
                Err(e)
            }
        };

        match result {
            Err(CuratorError::Store(StoreError::Conflict(reason))) if attempt < max_attempts => {
                crate::log_retry_attempt!(attempt, max_attempts, reason.as_str());
                attempt += 1;
            }
            other => return other,
        }
    }
}
