//! Result type alias for Curator
//!
//! This module provides a convenient Result type alias that uses CuratorError
//! as the error type.

use super::errors::CuratorError;

/// Result type alias for Curator operations
///
/// # Examples
///
/// ```
/// use curator::domain::result::Result;
/// use curator::domain::errors::CuratorError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CuratorError::Validation("documentId missing".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CuratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
