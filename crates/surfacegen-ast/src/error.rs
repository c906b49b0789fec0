//! Error types for the syntax-tree crate.

use thiserror::Error;

/// Errors raised while building, verifying, or (de)serializing a tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AstError {
    /// The tree violates a structural rule.
    #[error("malformed tree: {0}")]
    MalformedTree(String),

    /// Two methods in one class share a name.
    #[error("duplicate method '{0}'")]
    DuplicateMethod(String),

    /// An expression was used where an assignable target is required.
    #[error("invalid assignment target in '{method}': {detail}")]
    InvalidTarget { method: String, detail: String },

    /// An await expression appears inside a blocking method.
    #[error("await outside suspending method '{0}'")]
    AwaitOutsideSuspending(String),

    /// JSON interchange failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(String),
}

/// Result type for syntax-tree operations.
pub type AstResult<T> = Result<T, AstError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = AstError::MalformedTree("empty class name".into());
        assert_eq!(err.to_string(), "malformed tree: empty class name");

        let err = AstError::DuplicateMethod("search".into());
        assert_eq!(err.to_string(), "duplicate method 'search'");

        let err = AstError::InvalidTarget {
            method: "__init__".into(),
            detail: "call expression".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid assignment target in '__init__': call expression"
        );

        let err = AstError::AwaitOutsideSuspending("search".into());
        assert_eq!(err.to_string(), "await outside suspending method 'search'");
    }

    #[test]
    fn error_clone_and_eq() {
        let a = AstError::DuplicateMethod("x".into());
        assert_eq!(a.clone(), a);
        assert_ne!(a, AstError::DuplicateMethod("y".into()));
    }

    #[test]
    fn error_is_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(AstError::SerializationFailed("eof".into()));
        assert!(err.to_string().contains("eof"));
    }
}
