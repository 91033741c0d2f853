//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::Value;

/// Domain errors represent tree rule violations.
/// These are independent of input parsing and presentation concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Insert of a value already in the tree. The tree is left untouched.
    #[error("duplicate value not allowed: {0}")]
    DuplicateValue(Value),

    /// Lookup or delete of a value that is not in the tree.
    #[error("value not found: {0}")]
    ValueNotFound(Value),

    /// Structural precondition broken (missing rotation child, dangling id).
    /// Indicates a defect in the engine, never a user mistake.
    #[error("tree invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Whether the error is a recoverable notice rather than a defect.
    pub fn is_notice(&self) -> bool {
        !matches!(self, DomainError::InvariantViolation(_))
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
