//! Event ordering tests: the sequence the engine emits is part of its
//! contract, since renderers replay it step by step.

use std::cell::RefCell;

use rsavl::{AvlTree, EventLog, RotationRole, TreeEvent, TreeObserver};

fn labels(log: &EventLog) -> Vec<String> {
    log.events().iter().map(ToString::to_string).collect()
}

#[test]
fn given_rr_insert_then_events_follow_visit_insert_rebalance_rotate_order() {
    let mut tree = AvlTree::from_values([10, 20]);
    let mut log = EventLog::new();

    tree.insert_with(30, &mut log).unwrap();

    assert_eq!(
        labels(&log),
        vec![
            "visit 10",
            "visit 20",
            "insert 30",
            "rebalance RR at 10",
            "rotate 10 down",
            "rotate 20 up",
            "structure changed",
        ]
    );
}

#[test]
fn given_rl_insert_then_child_rotation_precedes_parent_rotation() {
    let mut tree = AvlTree::from_values([10, 30]);
    let mut log = EventLog::new();

    tree.insert_with(20, &mut log).unwrap();

    assert_eq!(
        labels(&log),
        vec![
            "visit 10",
            "visit 30",
            "insert 20",
            "rebalance RL at 10",
            "rotate 30 down",
            "rotate 20 up",
            "structure changed",
            "rotate 10 down",
            "rotate 20 up",
            "structure changed",
        ]
    );
}

#[test]
fn given_search_then_visits_path_regardless_of_outcome() {
    let tree = AvlTree::from_values([50, 30, 70, 20, 40, 60, 80]);

    let mut hit = EventLog::new();
    assert!(tree.search_with(40, &mut hit).is_some());
    assert_eq!(hit.visited_values(), vec![50, 30, 40]);

    let mut miss = EventLog::new();
    assert!(tree.search_with(65, &mut miss).is_none());
    assert_eq!(miss.visited_values(), vec![50, 70, 60]);
}

#[test]
fn given_traversals_then_no_events_are_needed() {
    // Traversals take no observer; the tree is only borrowed.
    let tree = AvlTree::from_values([2, 1, 3]);
    assert_eq!(tree.inorder(), vec![1, 2, 3]);
    assert_eq!(tree.preorder(), vec![2, 1, 3]);
    assert_eq!(tree.postorder(), vec![1, 3, 2]);
}

#[test]
fn given_rotation_steps_then_ids_match_live_nodes_after_change() {
    let mut tree = AvlTree::from_values([30, 20]);
    let mut log = EventLog::new();

    tree.insert_with(10, &mut log).unwrap();

    let promoted = log
        .events()
        .iter()
        .find_map(|e| match e {
            TreeEvent::RotationStep {
                id,
                role: RotationRole::Promoted,
                ..
            } => Some(*id),
            _ => None,
        })
        .expect("a promoted step");
    assert_eq!(tree.root(), Some(promoted));
}

#[test]
fn given_same_operations_then_event_streams_are_identical() {
    let run = || {
        let mut tree = AvlTree::new();
        let mut log = EventLog::new();
        for v in [40, 20, 60, 10, 30, 25, 5, 1] {
            tree.insert_with(v, &mut log).unwrap();
        }
        tree.delete_with(40, &mut log).unwrap();
        labels(&log)
    };

    assert_eq!(run(), run());
}

#[test]
fn given_recorded_log_when_replayed_then_forwards_every_event_in_order() {
    let mut tree = AvlTree::new();
    let mut log = EventLog::new();
    for v in [3, 2, 1] {
        tree.insert_with(v, &mut log).unwrap();
    }

    let mut copy = EventLog::new();
    log.replay(&mut copy);

    assert_eq!(copy.events(), log.events());
}

#[test]
fn given_closure_observer_then_receives_events() {
    let seen = RefCell::new(Vec::new());
    let mut observer = |e: &TreeEvent| seen.borrow_mut().push(*e);
    let mut tree = AvlTree::new();

    tree.insert_with(1, &mut observer).unwrap();
    tree.search_with(1, &mut observer);

    let seen = seen.into_inner();
    assert_eq!(seen.len(), 2);
    assert!(matches!(seen[0], TreeEvent::NodeInserted { value: 1, .. }));
    assert!(matches!(seen[1], TreeEvent::NodeVisited { value: 1, .. }));
}

#[test]
fn given_duplicate_insert_then_only_visits_are_emitted() {
    let mut tree = AvlTree::from_values([20, 10, 30]);
    let mut log = EventLog::new();

    assert!(tree.insert_with(30, &mut log).is_err());

    assert_eq!(log.visited_values(), vec![20, 30]);
    assert_eq!(log.events().len(), 2);
}

struct Counting(usize);

impl TreeObserver for Counting {
    fn on_event(&mut self, _event: &TreeEvent) {
        self.0 += 1;
    }
}

#[test]
fn given_custom_observer_then_engine_calls_it_synchronously() {
    let mut tree = AvlTree::new();
    let mut counter = Counting(0);

    tree.insert_with(1, &mut counter).unwrap();
    assert_eq!(counter.0, 1);
    tree.insert_with(2, &mut counter).unwrap();
    assert_eq!(counter.0, 3);
}
