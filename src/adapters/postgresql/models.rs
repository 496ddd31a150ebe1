//! Row mapping for the staging table

use crate::domain::{
    BatchId, CuratorError, DerivedFields, DocumentId, Record, RecordStatus, Result, StoreError,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio_postgres::Row;

/// Columns selected for a record, in [`ArticleRow::from_row`] order
pub const RECORD_COLUMNS: &str = "id, status, raw_text, derived_fields, batch_id, updated_at";

/// One row of the staging table, as stored
#[derive(Debug, Clone)]
pub struct ArticleRow {
    pub id: String,
    pub status: String,
    pub raw_text: Option<String>,
    pub derived_fields: Option<Value>,
    pub batch_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ArticleRow {
    /// Read the columns listed in [`RECORD_COLUMNS`]
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id").map_err(corrupt)?,
            status: row.try_get("status").map_err(corrupt)?,
            raw_text: row.try_get("raw_text").map_err(corrupt)?,
            derived_fields: row.try_get("derived_fields").map_err(corrupt)?,
            batch_id: row.try_get("batch_id").map_err(corrupt)?,
            updated_at: row.try_get("updated_at").map_err(corrupt)?,
        })
    }

    /// Convert into the domain record
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] for an unknown status, an invalid id,
    /// or derived fields that don't match the expected shape.
    pub fn into_record(self) -> Result<Record> {
        let id = DocumentId::new(self.id.as_str())
            .map_err(|e| StoreError::Corrupt(format!("invalid id '{}': {e}", self.id)))?;
        let status: RecordStatus = self
            .status
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("{id}: {e}")))?;
        let derived_fields = self
            .derived_fields
            .map(serde_json::from_value::<DerivedFields>)
            .transpose()
            .map_err(|e| StoreError::Corrupt(format!("{id}: derived_fields: {e}")))?;

        Ok(Record {
            id,
            status,
            raw_text: self.raw_text,
            derived_fields,
            batch_id: self.batch_id.map(BatchId::new),
            updated_at: self.updated_at,
        })
    }
}

fn corrupt(err: tokio_postgres::Error) -> CuratorError {
    StoreError::Corrupt(err.to_string()).into()
}
