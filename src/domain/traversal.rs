//! Read-only traversals over an [`AvlTree`].
//!
//! The `Vec` producing functions recurse the way the tree is defined; the
//! iterators walk with an explicit stack and hand out [`NodeView`]s so a
//! renderer can read heights and balance factors along the way.

use tracing::instrument;

use crate::domain::arena::AvlTree;
use crate::domain::entities::{NodeId, NodeView, TraversalOrder, Value};

impl AvlTree {
    /// Values in the requested order.
    #[instrument(level = "trace", skip(self))]
    pub fn traverse(&self, order: TraversalOrder) -> Vec<Value> {
        match order {
            TraversalOrder::Inorder => self.inorder(),
            TraversalOrder::Preorder => self.preorder(),
            TraversalOrder::Postorder => self.postorder(),
        }
    }

    /// Values in ascending order.
    pub fn inorder(&self) -> Vec<Value> {
        let mut out = Vec::with_capacity(self.len());
        self.collect_inorder(self.root, &mut out);
        out
    }

    pub fn preorder(&self) -> Vec<Value> {
        let mut out = Vec::with_capacity(self.len());
        self.collect_preorder(self.root, &mut out);
        out
    }

    pub fn postorder(&self) -> Vec<Value> {
        let mut out = Vec::with_capacity(self.len());
        self.collect_postorder(self.root, &mut out);
        out
    }

    /// Node count by recursive descent (1 + left + right).
    pub fn count(&self) -> usize {
        self.count_at(self.root)
    }

    fn count_at(&self, node: Option<NodeId>) -> usize {
        match node.and_then(|id| self.node(id)) {
            Some(n) => 1 + self.count_at(n.left()) + self.count_at(n.right()),
            None => 0,
        }
    }

    fn collect_inorder(&self, node: Option<NodeId>, out: &mut Vec<Value>) {
        if let Some(n) = node.and_then(|id| self.node(id)) {
            self.collect_inorder(n.left(), out);
            out.push(n.value());
            self.collect_inorder(n.right(), out);
        }
    }

    fn collect_preorder(&self, node: Option<NodeId>, out: &mut Vec<Value>) {
        if let Some(n) = node.and_then(|id| self.node(id)) {
            out.push(n.value());
            self.collect_preorder(n.left(), out);
            self.collect_preorder(n.right(), out);
        }
    }

    fn collect_postorder(&self, node: Option<NodeId>, out: &mut Vec<Value>) {
        if let Some(n) = node.and_then(|id| self.node(id)) {
            self.collect_postorder(n.left(), out);
            self.collect_postorder(n.right(), out);
            out.push(n.value());
        }
    }

    pub fn iter_preorder(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }

    pub fn iter_inorder(&self) -> InOrderIterator<'_> {
        InOrderIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }
}

pub struct PreOrderIterator<'a> {
    tree: &'a AvlTree,
    stack: Vec<NodeId>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a AvlTree) -> Self {
        Self {
            tree,
            stack: tree.root().into_iter().collect(),
        }
    }
}

impl Iterator for PreOrderIterator<'_> {
    type Item = NodeView;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let view = self.tree.view(id)?;
        // right first so left is popped first
        self.stack.extend(view.right);
        self.stack.extend(view.left);
        Some(view)
    }
}

pub struct InOrderIterator<'a> {
    tree: &'a AvlTree,
    stack: Vec<NodeId>,
}

impl<'a> InOrderIterator<'a> {
    fn new(tree: &'a AvlTree) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
        };
        iter.push_left_spine(tree.root());
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<NodeId>) {
        while let Some(id) = node {
            self.stack.push(id);
            node = self.tree.node(id).and_then(|n| n.left());
        }
    }
}

impl Iterator for InOrderIterator<'_> {
    type Item = NodeView;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let view = self.tree.view(id)?;
        self.push_left_spine(view.right);
        Some(view)
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a AvlTree,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a AvlTree) -> Self {
        Self {
            tree,
            stack: tree.root().map(|id| (id, false)).into_iter().collect(),
        }
    }
}

impl Iterator for PostOrderIterator<'_> {
    type Item = NodeView;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, visited)) = self.stack.pop() {
            let Some(view) = self.tree.view(id) else {
                continue;
            };
            if visited {
                return Some(view);
            }
            self.stack.push((id, true));
            if let Some(right) = view.right {
                self.stack.push((right, false));
            }
            if let Some(left) = view.left {
                self.stack.push((left, false));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    //        50
    //      /    \
    //    30      70
    //   /  \    /  \
    //  20  40  60  80
    #[fixture]
    fn full_tree() -> AvlTree {
        AvlTree::from_values([50, 30, 70, 20, 40, 60, 80])
    }

    #[rstest]
    #[case(TraversalOrder::Inorder, vec![20, 30, 40, 50, 60, 70, 80])]
    #[case(TraversalOrder::Preorder, vec![50, 30, 20, 40, 70, 60, 80])]
    #[case(TraversalOrder::Postorder, vec![20, 40, 30, 60, 80, 70, 50])]
    fn given_full_tree_when_traversing_then_yields_expected_order(
        full_tree: AvlTree,
        #[case] order: TraversalOrder,
        #[case] expected: Vec<Value>,
    ) {
        assert_eq!(full_tree.traverse(order), expected);
    }

    #[rstest]
    fn given_full_tree_then_iterators_match_recursive_traversals(full_tree: AvlTree) {
        let pre: Vec<_> = full_tree.iter_preorder().map(|v| v.value).collect();
        let ino: Vec<_> = full_tree.iter_inorder().map(|v| v.value).collect();
        let post: Vec<_> = full_tree.iter_postorder().map(|v| v.value).collect();
        assert_eq!(pre, full_tree.preorder());
        assert_eq!(ino, full_tree.inorder());
        assert_eq!(post, full_tree.postorder());
    }

    #[rstest]
    fn given_full_tree_then_count_matches_arena(full_tree: AvlTree) {
        assert_eq!(full_tree.count(), 7);
        assert_eq!(full_tree.count(), full_tree.len());
    }

    #[test]
    fn given_empty_tree_then_traversals_are_empty() {
        let tree = AvlTree::new();
        for order in TraversalOrder::ALL {
            assert!(tree.traverse(order).is_empty());
        }
        assert_eq!(tree.count(), 0);
        assert_eq!(tree.iter_inorder().count(), 0);
        assert_eq!(tree.iter_postorder().count(), 0);
    }

    #[rstest]
    fn given_iterator_then_exposes_balance_factors(full_tree: AvlTree) {
        assert!(full_tree.iter_inorder().all(|v| v.balance_factor == 0));
        let leaves = full_tree.iter_preorder().filter(|v| v.is_leaf()).count();
        assert_eq!(leaves, 4);
    }
}
