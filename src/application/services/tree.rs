//! Tree session service
//!
//! Owns one [`AvlTree`] and plays the caller role around the engine: it
//! validates input, checks existence before deleting so "not found" can be
//! reported, draws random values, and turns every top-level call into an
//! [`Outcome`] a front end can display. Mutations take `&mut self`, which is
//! what serializes top-level calls.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::command::TreeCommand;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{AvlTree, DomainError, NodeId, TraversalOrder, TreeObserver, Value};
use crate::infrastructure::traits::ValueSource;

/// Height and size of the tree, as shown in the stats panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub height: usize,
    pub count: usize,
}

/// Result of one successfully applied command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Inserted { value: Value, id: NodeId },
    Deleted { value: Value },
    Found { value: Value, id: NodeId },
    Cleared { removed: usize },
    Traversal { order: TraversalOrder, values: Vec<Value> },
    Stats(TreeStats),
    /// The front end should draw the tree
    Show,
    Help,
    Quit,
}

impl Outcome {
    /// Whether the tree structure may have changed.
    pub fn mutated(&self) -> bool {
        matches!(
            self,
            Outcome::Inserted { .. } | Outcome::Deleted { .. } | Outcome::Cleared { .. }
        )
    }
}

pub struct TreeService {
    tree: AvlTree,
    settings: Arc<Settings>,
    values: Arc<dyn ValueSource>,
}

impl TreeService {
    pub fn new(settings: Arc<Settings>, values: Arc<dyn ValueSource>) -> Self {
        Self {
            tree: AvlTree::new(),
            settings,
            values,
        }
    }

    pub fn tree(&self) -> &AvlTree {
        &self.tree
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[instrument(level = "debug", skip(self, observer))]
    pub fn insert(&mut self, value: Value, observer: &mut dyn TreeObserver) -> ApplicationResult<Outcome> {
        let id = self.tree.insert_with(value, observer)?;
        info!("inserted {}", value);
        Ok(Outcome::Inserted { value, id })
    }

    /// Delete an existing value.
    ///
    /// The engine treats a missing value as a silent no-op, so the existence
    /// check happens here first. The path is shown once: by the delete itself
    /// when the value exists, by a search when it does not.
    #[instrument(level = "debug", skip(self, observer))]
    pub fn delete(&mut self, value: Value, observer: &mut dyn TreeObserver) -> ApplicationResult<Outcome> {
        if !self.tree.contains(value) {
            debug!("delete: {} not present", value);
            self.tree.search_with(value, observer);
            return Err(DomainError::ValueNotFound(value).into());
        }
        let removed = self.tree.delete_with(value, observer)?;
        if !removed {
            return Err(DomainError::invariant(format!(
                "{} was found but delete removed nothing",
                value
            ))
            .into());
        }
        info!("deleted {}", value);
        Ok(Outcome::Deleted { value })
    }

    #[instrument(level = "debug", skip(self, observer))]
    pub fn search(&self, value: Value, observer: &mut dyn TreeObserver) -> ApplicationResult<Outcome> {
        match self.tree.search_with(value, observer) {
            Some(id) => Ok(Outcome::Found { value, id }),
            None => Err(DomainError::ValueNotFound(value).into()),
        }
    }

    /// Insert a value drawn from the configured range.
    ///
    /// A draw that is already present is reported as a duplicate, like any
    /// other insert.
    pub fn insert_random(&mut self, observer: &mut dyn TreeObserver) -> ApplicationResult<Outcome> {
        let range = &self.settings.random;
        let value = self.values.next_value(range.min, range.max);
        debug!("insert_random: drew {} from {}..={}", value, range.min, range.max);
        self.insert(value, observer)
    }

    pub fn clear(&mut self) -> Outcome {
        let removed = self.tree.len();
        self.tree.clear();
        Outcome::Cleared { removed }
    }

    pub fn traverse(&self, order: TraversalOrder) -> Outcome {
        Outcome::Traversal {
            order,
            values: self.tree.traverse(order),
        }
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            height: self.tree.height(),
            count: self.tree.count(),
        }
    }

    /// Apply one command.
    pub fn execute(
        &mut self,
        command: TreeCommand,
        observer: &mut dyn TreeObserver,
    ) -> ApplicationResult<Outcome> {
        debug!("execute: {}", command);
        match command {
            TreeCommand::Insert(value) => self.insert(value, observer),
            TreeCommand::Delete(value) => self.delete(value, observer),
            TreeCommand::Search(value) => self.search(value, observer),
            TreeCommand::Random => self.insert_random(observer),
            TreeCommand::Clear => Ok(self.clear()),
            TreeCommand::Traverse(order) => Ok(self.traverse(order)),
            TreeCommand::Stats => Ok(Outcome::Stats(self.stats())),
            TreeCommand::Show => Ok(Outcome::Show),
            TreeCommand::Help => Ok(Outcome::Help),
            TreeCommand::Quit => Ok(Outcome::Quit),
        }
    }

    /// Verify the tree after a mutation; failing here means an engine defect.
    pub fn verify(&self) -> ApplicationResult<()> {
        self.tree.check_invariants().map_err(ApplicationError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventLog, NoopObserver};
    use crate::infrastructure::traits::ScriptedSource;

    fn service(script: &[Value]) -> TreeService {
        TreeService::new(
            Arc::new(Settings::default()),
            Arc::new(ScriptedSource::new(script.to_vec())),
        )
    }

    #[test]
    fn given_missing_value_when_deleting_then_reports_not_found_after_search() {
        let mut svc = service(&[]);
        svc.insert(10, &mut NoopObserver).unwrap();
        let mut log = EventLog::new();

        let err = svc.delete(99, &mut log).unwrap_err();

        assert!(matches!(err, ApplicationError::Domain(DomainError::ValueNotFound(99))));
        assert_eq!(log.visited_values(), vec![10]);
        assert_eq!(svc.stats().count, 1);
    }

    #[test]
    fn given_present_value_when_deleting_then_path_is_visited_once() {
        let mut svc = service(&[]);
        for v in [50, 30, 70, 20, 40, 60, 80] {
            svc.insert(v, &mut NoopObserver).unwrap();
        }
        let mut log = EventLog::new();

        svc.delete(40, &mut log).unwrap();

        assert_eq!(log.visited_values(), vec![50, 30, 40]);
        assert_eq!(svc.tree().inorder(), vec![20, 30, 50, 60, 70, 80]);
    }

    #[test]
    fn given_duplicate_when_inserting_then_reports_and_keeps_count() {
        let mut svc = service(&[]);
        svc.insert(5, &mut NoopObserver).unwrap();
        let err = svc.insert(5, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, ApplicationError::Domain(DomainError::DuplicateValue(5))));
        assert!(err.is_notice());
        assert_eq!(svc.stats(), TreeStats { height: 1, count: 1 });
    }

    #[test]
    fn given_scripted_source_when_inserting_random_then_uses_drawn_value() {
        let mut svc = service(&[42, 42]);
        let outcome = svc.insert_random(&mut NoopObserver).unwrap();
        assert!(matches!(outcome, Outcome::Inserted { value: 42, .. }));
        assert!(svc.insert_random(&mut NoopObserver).is_err());
    }

    #[test]
    fn given_commands_when_executing_then_outcomes_follow() {
        let mut svc = service(&[]);
        for v in [10, 20, 30] {
            svc.execute(TreeCommand::Insert(v), &mut NoopObserver).unwrap();
        }
        let outcome = svc
            .execute(TreeCommand::Traverse(TraversalOrder::Preorder), &mut NoopObserver)
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Traversal {
                order: TraversalOrder::Preorder,
                values: vec![20, 10, 30]
            }
        );
        assert_eq!(
            svc.execute(TreeCommand::Clear, &mut NoopObserver).unwrap(),
            Outcome::Cleared { removed: 3 }
        );
        svc.verify().unwrap();
    }
}
