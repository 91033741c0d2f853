//! Domain layer: the AVL engine
//!
//! This layer is independent of external concerns (no I/O, no timing, no CLI).

pub mod arena;
pub mod entities;
pub mod error;
pub mod observer;
pub mod traversal;

pub use arena::{AvlNode, AvlTree};
pub use entities::{NodeId, NodeView, OrderParseError, TraversalOrder, Value};
pub use error::{DomainError, DomainResult};
pub use observer::{EventLog, NoopObserver, RotationCase, RotationRole, TreeEvent, TreeObserver};
pub use traversal::{InOrderIterator, PostOrderIterator, PreOrderIterator};
