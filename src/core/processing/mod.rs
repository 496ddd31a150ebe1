//! Record processing
//!
//! [`ProcessingOrchestrator`] runs the commit-then-publish sequence for one
//! task message and turns the result into an [`Acknowledgment`] for the
//! delivery system.

pub mod orchestrator;
pub mod outcome;

pub use orchestrator::{ProcessingOrchestrator, ProcessingSettings};
pub use outcome::{Acknowledgment, ErrorBody, ProcessingOutcome, SkipReason};
