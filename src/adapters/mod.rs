//! External system integrations for Curator.
//!
//! - [`store`] - Record store traits, factory and the transaction runner
//! - [`postgresql`] - PostgreSQL record store
//! - [`publisher`] - Notifier trait and factory
//! - [`pubsub`] - Google Cloud Pub/Sub REST publisher
//! - [`memory`] - In-process store and notifier for local runs and tests
//!
//! Adapters isolate external systems behind traits so the processing core can
//! be exercised against the in-memory implementations.

pub mod memory;
pub mod postgresql;
pub mod publisher;
pub mod pubsub;
pub mod store;
