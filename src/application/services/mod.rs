//! Application services

pub mod pacing;
pub mod tree;

pub use pacing::PacedObserver;
pub use tree::{Outcome, TreeService, TreeStats};
