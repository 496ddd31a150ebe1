//! Record store factory
//!
//! Builds the store selected by `store.target`.

use crate::adapters::memory::MemoryRecordStore;
use crate::adapters::postgresql::{PostgreSQLClient, PostgreSQLRecordStore};
use crate::adapters::store::traits::RecordStore;
use crate::config::schema::{CuratorConfig, StoreTarget};
use crate::domain::{CuratorError, Result};
use std::sync::Arc;

/// Create a record store based on the configuration
///
/// The PostgreSQL pool connects lazily, so a database that is down at startup
/// shows up in the health probe rather than failing here.
///
/// # Errors
///
/// Returns an error if the selected backend is not configured or its
/// client cannot be built.
pub fn create_record_store(config: &CuratorConfig) -> Result<Arc<dyn RecordStore>> {
    match config.store.target {
        StoreTarget::Memory => {
            tracing::warn!("Using in-memory record store; records are lost on restart");
            Ok(Arc::new(MemoryRecordStore::new()))
        }
        StoreTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                CuratorError::Configuration(
                    "postgresql configuration is required when store.target = 'postgresql'"
                        .to_string(),
                )
            })?;

            let client = PostgreSQLClient::new(pg_config.clone())?;
            tracing::info!(
                connection = %client.connection_string_safe(),
                table = %client.table(),
                "Creating PostgreSQL record store"
            );
            Ok(Arc::new(PostgreSQLRecordStore::new(client)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_is_default() {
        let store = create_record_store(&CuratorConfig::default()).unwrap();
        assert_eq!(store.backend_name(), "memory");
    }

    #[test]
    fn test_postgresql_requires_section() {
        let mut config = CuratorConfig::default();
        config.store.target = StoreTarget::PostgreSQL;
        assert!(matches!(
            create_record_store(&config),
            Err(CuratorError::Configuration(_))
        ));
    }
}
