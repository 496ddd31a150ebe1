//! Placeholder analyzer
//!
//! Stands in for the real content analysis. It tags every article as
//! analyzed and records its length in characters.

use super::DerivedFieldComputer;
use crate::domain::DerivedFields;

/// Category assigned to every article
pub const DEFAULT_CATEGORY: &str = "unclassified";

/// Tag marking an article as having passed through analysis
pub const ANALYZED_TAG: &str = "analyzed";

/// Deterministic analyzer used until a real one is wired in
#[derive(Debug, Clone, Copy, Default)]
pub struct StubAnalyzer;

impl DerivedFieldComputer for StubAnalyzer {
    fn compute(&self, raw_text: &str) -> DerivedFields {
        DerivedFields {
            categories: vec![DEFAULT_CATEGORY.to_string()],
            tags: vec![
                ANALYZED_TAG.to_string(),
                format!("chars_{}", raw_text.chars().count()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_counts_characters_not_bytes() {
        let fields = StubAnalyzer.compute("héllo");
        assert_eq!(fields.categories, vec!["unclassified"]);
        assert_eq!(fields.tags, vec!["analyzed", "chars_5"]);
    }

    #[test]
    fn test_stub_is_deterministic() {
        let text = "hello AI world";
        assert_eq!(StubAnalyzer.compute(text), StubAnalyzer.compute(text));
    }
}
