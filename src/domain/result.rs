//! Result type alias for hl7diff

use super::errors::Hl7DiffError;

/// Result type alias for hl7diff operations
///
/// # Examples
///
/// ```
/// use hl7diff::domain::result::Result;
/// use hl7diff::domain::errors::Hl7DiffError;
///
/// fn failing_function() -> Result<()> {
///     Err(Hl7DiffError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Hl7DiffError>;

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
