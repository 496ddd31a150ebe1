//! Record store abstraction layer
//!
//! Trait-based access to staged records, so the processing core works the
//! same against PostgreSQL and the in-memory store.

pub mod factory;
pub mod traits;
pub mod transaction;

pub use factory::create_record_store;
pub use traits::{RecordStore, RecordTransaction};
pub use transaction::run_transaction;
