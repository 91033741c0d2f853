//! Errors from the edges of rsavl: reading the shell's stdin and the
//! application failures that reach the front end unchanged.

use thiserror::Error;

use crate::application::ApplicationError;

#[derive(Error, Debug)]
pub enum InfraError {
    /// Tree, input or config failure raised below this layer
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Reading commands failed, e.g. stdin closed with an error
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
