//! Search node structures.
//!
//! Uses arena-based allocation with index references (NodeId), so the
//! parent back-reference never forms an ownership cycle.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::rules::ProblemState;

/// Index into the SearchTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node (the root's parent).
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Position in the arena.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A node in the search tree.
#[derive(Clone, Debug)]
pub struct SearchNode<S> {
    /// The problem state this node stands for.
    pub state: S,

    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Expanded children, in expansion order.
    /// SmallVec optimizes for typical branching factor < 8.
    pub children: SmallVec<[NodeId; 8]>,

    /// Depth in tree (root = 0).
    pub depth: u32,

    /// Rollouts backpropagated through this node.
    pub visits: u32,

    /// Sum of all rewards backpropagated through this node.
    pub quality: f64,
}

impl<S: ProblemState> SearchNode<S> {
    /// Create a new node.
    pub fn new(state: S, parent: NodeId, depth: u32) -> Self {
        Self {
            state,
            parent,
            children: SmallVec::new(),
            depth,
            visits: 0,
            quality: 0.0,
        }
    }

    /// Create a root node.
    pub fn root(state: S) -> Self {
        Self::new(state, NodeId::NONE, 0)
    }

    /// Check if this node has no parent.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if every distinct choice already has a child.
    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.children.len() == self.state.branching_factor()
    }

    #[inline]
    pub fn increment_visit(&mut self) {
        self.visits += 1;
    }

    #[inline]
    pub fn add_quality(&mut self, delta: f64) {
        self.quality += delta;
    }

    /// Average backpropagated reward (0 when unvisited).
    #[must_use]
    pub fn mean_quality(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.quality / self.visits as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::drift::DriftBuilder;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(5);
        assert_eq!(id.index(), 5);
        assert!(!id.is_none());
        assert_eq!(format!("{}", id), "NodeId(5)");

        assert!(NodeId::NONE.is_none());
        assert_eq!(format!("{}", NodeId::NONE), "NodeId(NONE)");
    }

    #[test]
    fn test_node_root() {
        let state = DriftBuilder::new().build().unwrap();
        let node = SearchNode::root(state);

        assert!(node.is_root());
        assert_eq!(node.depth, 0);
        assert_eq!(node.visits, 0);
        assert_eq!(node.quality, 0.0);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_node_bookkeeping() {
        let state = DriftBuilder::new().build().unwrap();
        let mut node = SearchNode::root(state);

        assert_eq!(node.mean_quality(), 0.0);

        node.increment_visit();
        node.add_quality(-3.0);
        node.increment_visit();
        node.add_quality(-1.0);

        assert_eq!(node.visits, 2);
        assert_eq!(node.quality, -4.0);
        assert_eq!(node.mean_quality(), -2.0);
    }

    #[test]
    fn test_fully_expanded_tracks_branching_factor() {
        let state = DriftBuilder::new().choices(vec![1, -1]).build().unwrap();
        let mut node = SearchNode::root(state);

        assert!(!node.is_fully_expanded());
        node.children.push(NodeId::new(1));
        assert!(!node.is_fully_expanded());
        node.children.push(NodeId::new(2));
        assert!(node.is_fully_expanded());
    }
}
