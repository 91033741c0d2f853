//! Domain entities: node identity, node snapshots and traversal orders.

use std::fmt;
use std::str::FromStr;

use generational_arena::Index;

/// Ordered scalar stored in the tree.
pub type Value = i64;

/// Stable identity of a node in the arena.
///
/// Wraps a generational index: once a node is removed its id never resolves
/// again, even if the slot is reused by a later insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) Index);

impl NodeId {
    /// Slot and generation of the underlying arena index.
    pub fn raw_parts(&self) -> (usize, u64) {
        self.0.into_raw_parts()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.raw_parts();
        write!(f, "n{}:{}", slot, generation)
    }
}

/// Read-only snapshot of a node, as handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeView {
    pub id: NodeId,
    pub value: Value,
    /// Subtree height, 1 for a leaf
    pub height: usize,
    /// Left height minus right height
    pub balance_factor: isize,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl NodeView {
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl fmt::Display for NodeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [h={} bf={}]",
            self.value, self.height, self.balance_factor
        )
    }
}

/// Depth-first visiting order for traversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// left, node, right (sorted ascending)
    Inorder,
    /// node, left, right
    Preorder,
    /// left, right, node
    Postorder,
}

impl TraversalOrder {
    pub const ALL: [TraversalOrder; 3] = [
        TraversalOrder::Inorder,
        TraversalOrder::Preorder,
        TraversalOrder::Postorder,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TraversalOrder::Inorder => "inorder",
            TraversalOrder::Preorder => "preorder",
            TraversalOrder::Postorder => "postorder",
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error parsing a traversal order name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderParseError {
    pub input: String,
}

impl fmt::Display for OrderParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown traversal order '{}' (expected inorder, preorder or postorder)",
            self.input
        )
    }
}

impl std::error::Error for OrderParseError {}

impl FromStr for TraversalOrder {
    type Err = OrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inorder" | "in" => Ok(TraversalOrder::Inorder),
            "preorder" | "pre" => Ok(TraversalOrder::Preorder),
            "postorder" | "post" => Ok(TraversalOrder::Postorder),
            _ => Err(OrderParseError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_order_names_when_parsing_then_round_trips_through_display() {
        for order in TraversalOrder::ALL {
            assert_eq!(order.to_string().parse::<TraversalOrder>(), Ok(order));
        }
        assert_eq!("PRE".parse::<TraversalOrder>(), Ok(TraversalOrder::Preorder));
    }

    #[test]
    fn given_unknown_order_when_parsing_then_errors() {
        assert!("levelorder".parse::<TraversalOrder>().is_err());
    }
}
