//! Downstream publisher abstraction
//!
//! Processed documents are announced to the next pipeline stage through a
//! [`Notifier`].

pub mod factory;
pub mod traits;

pub use factory::create_notifier;
pub use traits::{publish_and_wait, Notifier};
