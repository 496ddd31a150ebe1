//! PostgreSQL record store
//!
//! Transactions run at `SERIALIZABLE` isolation and lock the rows they read
//! with `SELECT ... FOR UPDATE`, so two deliveries for the same document
//! serialize on the row and the loser observes the winner's write. Serialization
//! failures surface as [`StoreError::Conflict`] and are retried by
//! [`run_transaction`](crate::adapters::store::run_transaction).

use crate::adapters::postgresql::client::{map_pg_error, PostgreSQLClient};
use crate::adapters::postgresql::models::{ArticleRow, RECORD_COLUMNS};
use crate::adapters::store::traits::{RecordStore, RecordTransaction};
use crate::domain::{CuratorError, DocumentId, Record, RecordUpdate, Result, StoreError};
use async_trait::async_trait;
use deadpool_postgres::Object;
use std::sync::Arc;

/// [`RecordStore`] backed by PostgreSQL
pub struct PostgreSQLRecordStore {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLRecordStore {
    /// Create a new store over an existing client
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

fn select_sql(table: &str, for_update: bool) -> String {
    let lock = if for_update { " FOR UPDATE" } else { "" };
    format!("SELECT {RECORD_COLUMNS} FROM {table} WHERE id = $1{lock}")
}

fn update_sql(table: &str) -> String {
    format!(
        "UPDATE {table} SET status = $2, \
         derived_fields = COALESCE($3, derived_fields), \
         batch_id = COALESCE($4, batch_id), \
         updated_at = clock_timestamp() \
         WHERE id = $1"
    )
}

async fn fetch(conn: &Object, sql: &str, id: &DocumentId) -> Result<Option<Record>> {
    let row = conn
        .query_opt(sql, &[&id.as_str()])
        .await
        .map_err(map_pg_error)?;

    row.map(|row| ArticleRow::from_row(&row)?.into_record())
        .transpose()
}

#[async_trait]
impl RecordStore for PostgreSQLRecordStore {
    async fn get(&self, id: &DocumentId) -> Result<Option<Record>> {
        let conn = self.client.checkout().await?;
        fetch(&conn, &select_sql(self.client.table(), false), id).await
    }

    async fn begin(&self) -> Result<Box<dyn RecordTransaction>> {
        let conn = self.client.checkout().await?;
        conn.batch_execute("BEGIN ISOLATION LEVEL SERIALIZABLE")
            .await
            .map_err(map_pg_error)?;

        tracing::trace!(table = %self.client.table(), "PostgreSQL transaction started");
        Ok(Box::new(PostgreSQLTransaction {
            conn: Some(conn),
            table: self.client.table().to_string(),
        }))
    }

    async fn ping(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    fn backend_name(&self) -> &'static str {
        "postgresql"
    }
}

/// Open transaction holding a pooled connection
///
/// A transaction dropped without commit or rollback detaches its connection
/// from the pool; closing it makes the server roll the transaction back.
pub struct PostgreSQLTransaction {
    conn: Option<Object>,
    table: String,
}

impl PostgreSQLTransaction {
    fn conn(&self) -> Result<&Object> {
        self.conn.as_ref().ok_or_else(|| {
            CuratorError::Unexpected("transaction already finished".to_string())
        })
    }

    /// Run COMMIT or ROLLBACK and release the connection
    async fn finish(mut self: Box<Self>, statement: &str) -> Result<()> {
        let conn = self.conn.take().ok_or_else(|| {
            CuratorError::Unexpected("transaction already finished".to_string())
        })?;

        match conn.batch_execute(statement).await {
            Ok(()) => Ok(()),
            Err(e) => {
                let err = map_pg_error(e);
                // A failed COMMIT after a serialization failure leaves the
                // session clean; anything else may not.
                if !matches!(err, CuratorError::Store(StoreError::Conflict(_))) {
                    drop(Object::take(conn));
                }
                Err(err)
            }
        }
    }
}

#[async_trait]
impl RecordTransaction for PostgreSQLTransaction {
    async fn get(&mut self, id: &DocumentId) -> Result<Option<Record>> {
        let sql = select_sql(&self.table, true);
        fetch(self.conn()?, &sql, id).await
    }

    async fn update(&mut self, id: &DocumentId, update: RecordUpdate) -> Result<()> {
        let derived_fields = update
            .derived_fields
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;
        let batch_id = update.batch_id.as_ref().map(|b| b.as_str());

        let affected = self
            .conn()?
            .execute(
                &update_sql(&self.table),
                &[
                    &id.as_str(),
                    &update.status.as_str(),
                    &derived_fields,
                    &batch_id,
                ],
            )
            .await
            .map_err(map_pg_error)?;

        if affected == 0 {
            return Err(CuratorError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.finish("COMMIT").await
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.finish("ROLLBACK").await
    }
}

impl Drop for PostgreSQLTransaction {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            tracing::warn!(table = %self.table, "Transaction dropped while open, discarding connection");
            drop(Object::take(conn));
        }
    }
}
