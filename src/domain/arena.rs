//! Arena-backed AVL tree.
//!
//! Nodes live in a generational arena and refer to their children by
//! [`NodeId`]. Every id is held by exactly one parent slot (or the root slot),
//! so the links form a strict binary ownership hierarchy even though the
//! storage is flat. Rotations relink ids instead of moving boxed subtrees.

use std::cmp::Ordering;

use generational_arena::Arena;
use tracing::{debug, instrument, trace};

use crate::domain::entities::{NodeId, NodeView, Value};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::observer::{NoopObserver, RotationCase, RotationRole, TreeEvent, TreeObserver};

/// Tree node stored in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvlNode {
    value: Value,
    left: Option<NodeId>,
    right: Option<NodeId>,
    /// 1 + max(height(left), height(right)); a leaf has height 1
    height: usize,
}

impl AvlNode {
    fn leaf(value: Value) -> Self {
        Self {
            value,
            left: None,
            right: None,
            height: 1,
        }
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

/// Self-balancing binary search tree over unique [`Value`]s.
///
/// All mutating operations take `&mut self`, so top-level calls on one tree
/// are serialized by the borrow checker. Each call either completes with the
/// AVL invariants restored or leaves the tree untouched.
#[derive(Debug, Clone)]
pub struct AvlTree {
    /// Arena storage for all tree nodes
    pub(crate) arena: Arena<AvlNode>,
    /// Root node, None for empty trees
    pub(crate) root: Option<NodeId>,
}

impl Default for AvlTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AvlTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Build a tree by inserting `values` one at a time, skipping duplicates.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let mut tree = Self::new();
        for value in values {
            if let Err(e) = tree.insert(value) {
                trace!("from_values: skipping {}: {}", value, e);
            }
        }
        tree
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&AvlNode> {
        self.arena.get(id.0)
    }

    /// Snapshot of a node with its balance factor, for renderers.
    pub fn view(&self, id: NodeId) -> Option<NodeView> {
        let node = self.node(id)?;
        Some(NodeView {
            id,
            value: node.value,
            height: node.height,
            balance_factor: self.balance_factor(Some(id)),
            left: node.left,
            right: node.right,
        })
    }

    pub fn root_view(&self) -> Option<NodeView> {
        self.root.and_then(|id| self.view(id))
    }

    /// Number of live nodes in the arena.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree, 0 when empty.
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    /// Drop every node.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        debug!("clear: dropping {} nodes", self.arena.len());
        self.arena.clear();
        self.root = None;
    }

    // ------------------------------------------------------------
    // Balance primitives
    // ------------------------------------------------------------

    /// Stored height, 0 for an absent node.
    pub fn height_of(&self, id: Option<NodeId>) -> usize {
        id.and_then(|id| self.node(id)).map_or(0, |n| n.height)
    }

    /// Left height minus right height, 0 for an absent node.
    pub fn balance_factor(&self, id: Option<NodeId>) -> isize {
        match id.and_then(|id| self.node(id)) {
            Some(node) => self.height_of(node.left) as isize - self.height_of(node.right) as isize,
            None => 0,
        }
    }

    fn update_height(&mut self, id: NodeId) -> DomainResult<()> {
        let node = self.node_ref(id)?;
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.node_mut(id)?.height = height;
        Ok(())
    }

    fn node_ref(&self, id: NodeId) -> DomainResult<&AvlNode> {
        self.arena
            .get(id.0)
            .ok_or_else(|| DomainError::invariant(format!("dangling node id {}", id)))
    }

    fn node_mut(&mut self, id: NodeId) -> DomainResult<&mut AvlNode> {
        self.arena
            .get_mut(id.0)
            .ok_or_else(|| DomainError::invariant(format!("dangling node id {}", id)))
    }

    // ------------------------------------------------------------
    // Rotations
    // ------------------------------------------------------------

    fn emit_rotation_step(
        &self,
        id: NodeId,
        role: RotationRole,
        observer: &mut dyn TreeObserver,
    ) -> DomainResult<()> {
        let value = self.node_ref(id)?.value;
        observer.on_event(&TreeEvent::RotationStep { id, value, role });
        Ok(())
    }

    /// Rotate `y` right around its left child `x`; returns `x`.
    fn rotate_right(&mut self, y: NodeId, observer: &mut dyn TreeObserver) -> DomainResult<NodeId> {
        let x = self.node_ref(y)?.left.ok_or_else(|| {
            DomainError::invariant(format!("right rotation at {} without a left child", y))
        })?;
        let t2 = self.node_ref(x)?.right;

        self.emit_rotation_step(y, RotationRole::Pivot, observer)?;
        self.emit_rotation_step(x, RotationRole::Promoted, observer)?;

        self.node_mut(x)?.right = Some(y);
        self.node_mut(y)?.left = t2;

        self.update_height(y)?;
        self.update_height(x)?;
        trace!("rotate_right: {} -> {}", y, x);

        observer.on_event(&TreeEvent::StructureChanged);
        Ok(x)
    }

    /// Rotate `x` left around its right child `y`; returns `y`.
    fn rotate_left(&mut self, x: NodeId, observer: &mut dyn TreeObserver) -> DomainResult<NodeId> {
        let y = self.node_ref(x)?.right.ok_or_else(|| {
            DomainError::invariant(format!("left rotation at {} without a right child", x))
        })?;
        let t2 = self.node_ref(y)?.left;

        self.emit_rotation_step(x, RotationRole::Pivot, observer)?;
        self.emit_rotation_step(y, RotationRole::Promoted, observer)?;

        self.node_mut(y)?.left = Some(x);
        self.node_mut(x)?.right = t2;

        self.update_height(x)?;
        self.update_height(y)?;
        trace!("rotate_left: {} -> {}", x, y);

        observer.on_event(&TreeEvent::StructureChanged);
        Ok(y)
    }

    /// Run the rotations for `case` at `id`; returns the new subtree root.
    fn apply_case(
        &mut self,
        id: NodeId,
        case: RotationCase,
        observer: &mut dyn TreeObserver,
    ) -> DomainResult<NodeId> {
        let value = self.node_ref(id)?.value;
        debug!("rebalance: case {} at {}", case, value);
        observer.on_event(&TreeEvent::Rebalanced { id, value, case });

        match case {
            RotationCase::LL => self.rotate_right(id, observer),
            RotationCase::RR => self.rotate_left(id, observer),
            RotationCase::LR => {
                let left = self.node_ref(id)?.left.ok_or_else(|| {
                    DomainError::invariant(format!("LR case at {} without a left child", value))
                })?;
                let new_left = self.rotate_left(left, observer)?;
                self.node_mut(id)?.left = Some(new_left);
                self.rotate_right(id, observer)
            }
            RotationCase::RL => {
                let right = self.node_ref(id)?.right.ok_or_else(|| {
                    DomainError::invariant(format!("RL case at {} without a right child", value))
                })?;
                let new_right = self.rotate_right(right, observer)?;
                self.node_mut(id)?.right = Some(new_right);
                self.rotate_left(id, observer)
            }
        }
    }

    // ------------------------------------------------------------
    // Insert
    // ------------------------------------------------------------

    /// Insert `value`; returns the id of the new node.
    ///
    /// A duplicate yields [`DomainError::DuplicateValue`] and leaves the tree
    /// unchanged.
    pub fn insert(&mut self, value: Value) -> DomainResult<NodeId> {
        self.insert_with(value, &mut NoopObserver)
    }

    #[instrument(level = "debug", skip(self, observer))]
    pub fn insert_with(
        &mut self,
        value: Value,
        observer: &mut dyn TreeObserver,
    ) -> DomainResult<NodeId> {
        let (root, inserted) = self.insert_at(self.root, value, observer)?;
        self.root = Some(root);
        debug!("insert: {} as {}, height now {}", value, inserted, self.height());
        Ok(inserted)
    }

    /// Returns (new subtree root, inserted node).
    fn insert_at(
        &mut self,
        node: Option<NodeId>,
        value: Value,
        observer: &mut dyn TreeObserver,
    ) -> DomainResult<(NodeId, NodeId)> {
        let Some(id) = node else {
            let id = NodeId(self.arena.insert(AvlNode::leaf(value)));
            observer.on_event(&TreeEvent::NodeInserted { id, value });
            return Ok((id, id));
        };

        let current = self.node_ref(id)?;
        let (current_value, left, right) = (current.value, current.left, current.right);
        observer.on_event(&TreeEvent::NodeVisited {
            id,
            value: current_value,
        });

        let inserted = match value.cmp(&current_value) {
            Ordering::Less => {
                let (child, inserted) = self.insert_at(left, value, observer)?;
                self.node_mut(id)?.left = Some(child);
                inserted
            }
            Ordering::Greater => {
                let (child, inserted) = self.insert_at(right, value, observer)?;
                self.node_mut(id)?.right = Some(child);
                inserted
            }
            Ordering::Equal => return Err(DomainError::DuplicateValue(value)),
        };

        self.update_height(id)?;
        let root = self.rebalance_after_insert(id, value, observer)?;
        Ok((root, inserted))
    }

    /// Pick the case by comparing the inserted value with the heavy child's
    /// value: only one path changed, so that comparison names the heavy side.
    fn rebalance_after_insert(
        &mut self,
        id: NodeId,
        value: Value,
        observer: &mut dyn TreeObserver,
    ) -> DomainResult<NodeId> {
        let bf = self.balance_factor(Some(id));
        let node = self.node_ref(id)?;
        let (left, right) = (node.left, node.right);

        if bf > 1 {
            let left_value = self.child_value(left, id)?;
            match value.cmp(&left_value) {
                Ordering::Less => return self.apply_case(id, RotationCase::LL, observer),
                Ordering::Greater => return self.apply_case(id, RotationCase::LR, observer),
                Ordering::Equal => {}
            }
        } else if bf < -1 {
            let right_value = self.child_value(right, id)?;
            match value.cmp(&right_value) {
                Ordering::Greater => return self.apply_case(id, RotationCase::RR, observer),
                Ordering::Less => return self.apply_case(id, RotationCase::RL, observer),
                Ordering::Equal => {}
            }
        }
        Ok(id)
    }

    fn child_value(&self, child: Option<NodeId>, parent: NodeId) -> DomainResult<Value> {
        let child = child.ok_or_else(|| {
            DomainError::invariant(format!("unbalanced node {} is missing its heavy child", parent))
        })?;
        Ok(self.node_ref(child)?.value)
    }

    // ------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------

    /// Delete `value`; returns whether a node was removed.
    ///
    /// Deleting a value that is not present is a silent no-op (`Ok(false)`).
    /// Callers that must report "not found" check with [`AvlTree::contains`]
    /// first.
    pub fn delete(&mut self, value: Value) -> DomainResult<bool> {
        self.delete_with(value, &mut NoopObserver)
    }

    #[instrument(level = "debug", skip(self, observer))]
    pub fn delete_with(
        &mut self,
        value: Value,
        observer: &mut dyn TreeObserver,
    ) -> DomainResult<bool> {
        let (root, removed) = self.delete_at(self.root, value, observer)?;
        self.root = root;
        debug!("delete: {} removed={}, height now {}", value, removed, self.height());
        Ok(removed)
    }

    /// Returns (new subtree root or None, whether a node was removed).
    fn delete_at(
        &mut self,
        node: Option<NodeId>,
        value: Value,
        observer: &mut dyn TreeObserver,
    ) -> DomainResult<(Option<NodeId>, bool)> {
        let Some(id) = node else {
            return Ok((None, false));
        };

        let current = self.node_ref(id)?;
        let (current_value, left, right) = (current.value, current.left, current.right);
        observer.on_event(&TreeEvent::NodeVisited {
            id,
            value: current_value,
        });

        let (subtree, removed) = match value.cmp(&current_value) {
            Ordering::Less => {
                let (child, removed) = self.delete_at(left, value, observer)?;
                self.node_mut(id)?.left = child;
                (Some(id), removed)
            }
            Ordering::Greater => {
                let (child, removed) = self.delete_at(right, value, observer)?;
                self.node_mut(id)?.right = child;
                (Some(id), removed)
            }
            Ordering::Equal => match (left, right) {
                (Some(_), Some(right)) => {
                    let successor = self.min_value(right)?;
                    trace!("delete: {} replaced by successor {}", current_value, successor);
                    self.node_mut(id)?.value = successor;
                    let (child, removed) = self.delete_at(Some(right), successor, observer)?;
                    self.node_mut(id)?.right = child;
                    (Some(id), removed)
                }
                (child, None) | (None, child) => {
                    self.arena.remove(id.0);
                    observer.on_event(&TreeEvent::NodeRemoved {
                        id,
                        value: current_value,
                    });
                    (child, true)
                }
            },
        };

        let Some(subtree) = subtree else {
            return Ok((None, removed));
        };
        self.update_height(subtree)?;
        let root = self.rebalance_after_delete(subtree, observer)?;
        Ok((Some(root), removed))
    }

    /// Smallest value in the subtree rooted at `id`.
    fn min_value(&self, mut id: NodeId) -> DomainResult<Value> {
        while let Some(left) = self.node_ref(id)?.left {
            id = left;
        }
        Ok(self.node_ref(id)?.value)
    }

    /// Pick the case from the heavy child's own balance factor: a deletion
    /// does not single out one path the way an insertion does.
    fn rebalance_after_delete(
        &mut self,
        id: NodeId,
        observer: &mut dyn TreeObserver,
    ) -> DomainResult<NodeId> {
        let bf = self.balance_factor(Some(id));
        let node = self.node_ref(id)?;
        let (left, right) = (node.left, node.right);

        if bf > 1 {
            let case = if self.balance_factor(left) >= 0 {
                RotationCase::LL
            } else {
                RotationCase::LR
            };
            return self.apply_case(id, case, observer);
        }
        if bf < -1 {
            let case = if self.balance_factor(right) <= 0 {
                RotationCase::RR
            } else {
                RotationCase::RL
            };
            return self.apply_case(id, case, observer);
        }
        Ok(id)
    }

    // ------------------------------------------------------------
    // Search
    // ------------------------------------------------------------

    /// Find the node holding `value`.
    pub fn search(&self, value: Value) -> Option<NodeId> {
        self.search_with(value, &mut NoopObserver)
    }

    /// Find the node holding `value`, emitting `NodeVisited` for every node
    /// examined whether or not the value is found.
    #[instrument(level = "debug", skip(self, observer))]
    pub fn search_with(&self, value: Value, observer: &mut dyn TreeObserver) -> Option<NodeId> {
        self.search_at(self.root, value, observer)
    }

    fn search_at(
        &self,
        node: Option<NodeId>,
        value: Value,
        observer: &mut dyn TreeObserver,
    ) -> Option<NodeId> {
        let id = node?;
        let current = self.node(id)?;
        observer.on_event(&TreeEvent::NodeVisited {
            id,
            value: current.value,
        });

        match value.cmp(&current.value) {
            Ordering::Equal => Some(id),
            Ordering::Less => self.search_at(current.left, value, observer),
            Ordering::Greater => self.search_at(current.right, value, observer),
        }
    }

    /// Existence check without observer events.
    pub fn contains(&self, value: Value) -> bool {
        self.search(value).is_some()
    }

    // ------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------

    /// Verify ordering, height bookkeeping, balance and arena consistency.
    pub fn check_invariants(&self) -> DomainResult<()> {
        let reachable = self.check_subtree(self.root, None, None)?.1;
        if reachable != self.arena.len() {
            return Err(DomainError::invariant(format!(
                "{} nodes reachable but {} stored",
                reachable,
                self.arena.len()
            )));
        }
        Ok(())
    }

    /// Returns (height, node count) of a valid subtree with values in (lo, hi).
    fn check_subtree(
        &self,
        node: Option<NodeId>,
        lo: Option<Value>,
        hi: Option<Value>,
    ) -> DomainResult<(usize, usize)> {
        let Some(id) = node else {
            return Ok((0, 0));
        };
        let n = self.node_ref(id)?;

        if lo.is_some_and(|lo| n.value <= lo) || hi.is_some_and(|hi| n.value >= hi) {
            return Err(DomainError::invariant(format!(
                "value {} out of order at {}",
                n.value, id
            )));
        }

        let (lh, lc) = self.check_subtree(n.left, lo, Some(n.value))?;
        let (rh, rc) = self.check_subtree(n.right, Some(n.value), hi)?;

        let height = 1 + lh.max(rh);
        if n.height != height {
            return Err(DomainError::invariant(format!(
                "stored height {} != {} at {}",
                n.height, height, n.value
            )));
        }
        let bf = lh as isize - rh as isize;
        if !(-1..=1).contains(&bf) {
            return Err(DomainError::invariant(format!(
                "balance factor {} at {}",
                bf, n.value
            )));
        }
        Ok((height, 1 + lc + rc))
    }
}
