//! Derived field computation
//!
//! The analysis that annotates an article is an injectable capability. It runs
//! inside the processing transaction, so implementations must be pure and may
//! not fail: anything that can go wrong has to be handled before the value
//! is returned.

pub mod stub;

pub use stub::StubAnalyzer;

use crate::domain::DerivedFields;

/// Computes annotation fields from an article's raw text
pub trait DerivedFieldComputer: Send + Sync {
    /// Maps raw text to derived fields. Deterministic and side-effect free.
    fn compute(&self, raw_text: &str) -> DerivedFields;
}
