//! Application layer: services and use cases
//!
//! This layer orchestrates the engine and depends on I/O boundary traits.

pub mod command;
pub mod error;
pub mod services;

pub use command::{parse_line, parse_tokens, parse_value, TreeCommand};
pub use error::{ApplicationError, ApplicationResult};
