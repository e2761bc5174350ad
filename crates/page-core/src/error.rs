//! Page error types.

use thiserror::Error;

/// Errors raised by the document layer and its storage.
///
/// Configuration problems are reported by the workload through `anyhow`.
#[derive(Error, Debug)]
pub enum PageError {
    /// Selector syntax outside the supported subset.
    #[error("Unsupported selector: {0}")]
    UnsupportedSelector(String),

    /// A required element is missing from the document.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// The key-value store rejected an operation or is unavailable.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Failed to encode or decode a stored value.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for page operations.
pub type PageResult<T> = Result<T, PageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_value_errors_convert() {
        let err: PageError = serde_json::from_str::<Vec<String>>("{").unwrap_err().into();
        assert!(matches!(err, PageError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error: "));
        assert_eq!(
            PageError::Storage("quota exceeded".into()).to_string(),
            "Storage error: quota exceeded"
        );
    }
}
