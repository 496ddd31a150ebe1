//! In-process adapters
//!
//! Used for local development and as test doubles.

pub mod notifier;
pub mod store;

pub use notifier::{MemoryNotifier, PublishedMessage};
pub use store::{MemoryRecordStore, MemoryTransaction};
