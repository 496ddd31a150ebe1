//! PostgreSQL integration
//!
//! Stores staged articles in a single table and implements the record store
//! on top of serializable transactions.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::{PostgreSQLRecordStore, PostgreSQLTransaction};
pub use client::PostgreSQLClient;
pub use models::ArticleRow;
