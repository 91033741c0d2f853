//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add input/config context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Rejected before reaching the tree.
    #[error("invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    pub fn invalid_input(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Recoverable conditions that a front end reports and moves past.
    pub fn is_notice(&self) -> bool {
        match self {
            ApplicationError::Domain(e) => e.is_notice(),
            ApplicationError::InvalidInput { .. } => true,
            ApplicationError::Config { .. } => false,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
