//! Error types for the editor core

use thiserror::Error;

/// Result type alias using EditorError
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors that can occur in the editor core
///
/// Operations referencing a missing node or edge id are deliberately not
/// errors: they resolve as silent no-ops. A simulated execution failure
/// is a normal terminal node status, not an error either.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Imported document is malformed
    #[error("Invalid document: {0}")]
    Validation(String),

    /// Imported document contains a node with an empty id
    #[error("Invalid document: node id must not be empty")]
    EmptyNodeId,

    /// Imported document contains two nodes with the same id
    #[error("Invalid document: duplicate node id '{0}'")]
    DuplicateNodeId(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditorError {
    /// Create a validation error with a message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this error is a document validation failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::EmptyNodeId | Self::DuplicateNodeId(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(EditorError::validation("missing field").is_validation());
        assert!(EditorError::DuplicateNodeId("n1".into()).is_validation());
        assert!(!EditorError::Io(std::io::Error::other("disk")).is_validation());
    }

    #[test]
    fn test_display_includes_offending_id() {
        let err = EditorError::DuplicateNodeId("node-7".into());
        assert!(err.to_string().contains("node-7"));
    }
}
