//! Outside-world seams for the tree session.
//!
//! Step delays and random draws sit behind traits in [`traits`]; the
//! container in [`di`] picks real or scripted implementations.

pub mod di;
pub mod error;
pub mod traits;

pub use error::InfraError;
