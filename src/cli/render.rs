//! Text drawing of the tree and of engine steps.

use termtree::Tree;

use crate::cli::output;
use crate::domain::{AvlTree, NodeId, RotationRole, TreeEvent, TreeObserver};

const EMPTY_SLOT: &str = "·";

/// Build a termtree for the whole tree, or None when it is empty.
///
/// Children are listed left first. A node with a single child shows a `·`
/// in the missing slot so left and right stay distinguishable.
pub fn to_termtree(tree: &AvlTree, show_balance: bool) -> Option<Tree<String>> {
    tree.root()
        .map(|root| build_subtree(tree, root, "", show_balance))
}

fn build_subtree(tree: &AvlTree, id: NodeId, side: &str, show_balance: bool) -> Tree<String> {
    let Some(view) = tree.view(id) else {
        return Tree::new(format!("{side}{EMPTY_SLOT}"));
    };
    let label = if show_balance {
        format!("{side}{view}")
    } else {
        format!("{side}{}", view.value)
    };
    if view.is_leaf() {
        return Tree::new(label);
    }

    let leaves: Vec<Tree<String>> = [("L ", view.left), ("R ", view.right)]
        .into_iter()
        .map(|(side, child)| match child {
            Some(child) => build_subtree(tree, child, side, show_balance),
            None => Tree::new(format!("{side}{EMPTY_SLOT}")),
        })
        .collect();

    Tree::new(label).with_leaves(leaves)
}

/// Render the tree as text.
pub fn render_tree(tree: &AvlTree, show_balance: bool) -> String {
    match to_termtree(tree, show_balance) {
        Some(t) => t.to_string(),
        None => "(empty tree)\n".to_string(),
    }
}

/// Observer printing each engine step, used with `--steps`.
#[derive(Debug, Default)]
pub struct StepPrinter {
    enabled: bool,
}

impl StepPrinter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl TreeObserver for StepPrinter {
    fn on_event(&mut self, event: &TreeEvent) {
        if !self.enabled {
            return;
        }
        let marker = match event {
            TreeEvent::NodeVisited { .. } => "→",
            TreeEvent::NodeInserted { .. } => "+",
            TreeEvent::NodeRemoved { .. } => "-",
            TreeEvent::Rebalanced { .. } => "⟳",
            TreeEvent::RotationStep { role: RotationRole::Pivot, .. } => "↓",
            TreeEvent::RotationStep { role: RotationRole::Promoted, .. } => "↑",
            TreeEvent::StructureChanged => "=",
        };
        output::step(marker, event);
    }
}
