//! Step observer: the engine's only outward-facing boundary.
//!
//! The tree calls [`TreeObserver::on_event`] synchronously at defined points of
//! every top-level operation. It does not continue until the observer returns,
//! so an observer may block to pace or animate a step.
//!
//! Emission order for one primitive rotation:
//! 1. `RotationStep { role: Pivot }` for the node being rotated down
//! 2. `RotationStep { role: Promoted }` for the child taking its place
//! 3. `StructureChanged` once links and heights are updated
//!
//! A double rotation (LR, RL) emits that sequence twice, child rotation first,
//! preceded by a single `Rebalanced` naming the case.

use std::fmt;

use crate::domain::entities::{NodeId, Value};

/// Which node a rotation step refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationRole {
    /// Node being rotated down (`y` in a right rotation)
    Pivot,
    /// Child being promoted to subtree root (`x` in a right rotation)
    Promoted,
}

/// The four AVL rebalancing cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationCase {
    /// Left-left: single right rotation
    LL,
    /// Right-right: single left rotation
    RR,
    /// Left-right: left rotation on the left child, then right rotation
    LR,
    /// Right-left: right rotation on the right child, then left rotation
    RL,
}

impl RotationCase {
    pub fn is_double(&self) -> bool {
        matches!(self, RotationCase::LR | RotationCase::RL)
    }
}

impl fmt::Display for RotationCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RotationCase::LL => "LL",
            RotationCase::RR => "RR",
            RotationCase::LR => "LR",
            RotationCase::RL => "RL",
        };
        f.write_str(name)
    }
}

/// Step emitted by the engine during a top-level operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// A node was compared against the target value
    NodeVisited { id: NodeId, value: Value },
    /// A fresh leaf was linked in
    NodeInserted { id: NodeId, value: Value },
    /// A node was unlinked and freed
    NodeRemoved { id: NodeId, value: Value },
    /// Imbalance detected at `id`; rotations for `case` follow
    Rebalanced {
        id: NodeId,
        value: Value,
        case: RotationCase,
    },
    /// A node takes part in a primitive rotation, emitted before relinking
    RotationStep {
        id: NodeId,
        value: Value,
        role: RotationRole,
    },
    /// Links changed; a renderer should redraw
    StructureChanged,
}

impl fmt::Display for TreeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeEvent::NodeVisited { value, .. } => write!(f, "visit {}", value),
            TreeEvent::NodeInserted { value, .. } => write!(f, "insert {}", value),
            TreeEvent::NodeRemoved { value, .. } => write!(f, "remove {}", value),
            TreeEvent::Rebalanced { value, case, .. } => {
                write!(f, "rebalance {} at {}", case, value)
            }
            TreeEvent::RotationStep { value, role, .. } => match role {
                RotationRole::Pivot => write!(f, "rotate {} down", value),
                RotationRole::Promoted => write!(f, "rotate {} up", value),
            },
            TreeEvent::StructureChanged => f.write_str("structure changed"),
        }
    }
}

/// Receiver of engine steps.
pub trait TreeObserver {
    fn on_event(&mut self, event: &TreeEvent);
}

impl<F> TreeObserver for F
where
    F: FnMut(&TreeEvent),
{
    fn on_event(&mut self, event: &TreeEvent) {
        self(event)
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TreeObserver for NoopObserver {
    fn on_event(&mut self, _event: &TreeEvent) {}
}

/// Observer that records events in order, for replay and assertions.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<TreeEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TreeEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Rebalancing cases in the order they fired.
    pub fn rotation_cases(&self) -> Vec<RotationCase> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TreeEvent::Rebalanced { case, .. } => Some(*case),
                _ => None,
            })
            .collect()
    }

    /// Values of visited nodes in visiting order.
    pub fn visited_values(&self) -> Vec<Value> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TreeEvent::NodeVisited { value, .. } => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Feed the recorded events to another observer, preserving order.
    pub fn replay(&self, observer: &mut dyn TreeObserver) {
        for event in &self.events {
            observer.on_event(event);
        }
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TreeObserver for EventLog {
    fn on_event(&mut self, event: &TreeEvent) {
        self.events.push(*event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_closure_when_used_as_observer_then_receives_events() {
        let mut seen = 0;
        {
            let mut observer = |_: &TreeEvent| seen += 1;
            observer.on_event(&TreeEvent::StructureChanged);
            observer.on_event(&TreeEvent::StructureChanged);
        }
        assert_eq!(seen, 2);
    }

    #[test]
    fn given_recorded_log_when_replaying_then_order_is_preserved() {
        let mut log = EventLog::new();
        log.on_event(&TreeEvent::StructureChanged);
        let mut copy = EventLog::new();
        log.replay(&mut copy);
        assert_eq!(log.events(), copy.events());
    }

    #[test]
    fn given_double_cases_then_is_double_reports_them() {
        assert!(RotationCase::LR.is_double());
        assert!(RotationCase::RL.is_double());
        assert!(!RotationCase::LL.is_double());
        assert!(!RotationCase::RR.is_double());
    }
}
