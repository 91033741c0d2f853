//! rsavl: a self-balancing AVL tree whose every step can be watched.
//!
//! The engine ([`domain::AvlTree`]) reports visits, rotations and
//! structural changes to a [`domain::TreeObserver`] synchronously, in the
//! order they happen. Layers on top of it:
//!
//! - `application`: command grammar, the tree session service, step pacing
//! - `infrastructure`: pacer and random-value seams, dependency wiring
//! - `cli`: argument parsing, tree drawing, the interactive shell

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{
    AvlTree, DomainError, DomainResult, EventLog, NodeId, NodeView, NoopObserver, RotationCase,
    RotationRole, TraversalOrder, TreeEvent, TreeObserver, Value,
};
