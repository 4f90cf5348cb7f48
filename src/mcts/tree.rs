//! Arena-based search tree.
//!
//! Uses a flat `Vec<SearchNode>` with index-based references. Releasing
//! discarded subtrees after a decision is a compaction pass over the arena.

use rustc_hash::FxHashMap;

use super::node::{NodeId, SearchNode};
use crate::rules::ProblemState;

/// Arena-based search tree.
///
/// Nodes are stored in a flat vector and referenced by `NodeId` indices.
/// The root is always at index 0.
#[derive(Clone, Debug)]
pub struct SearchTree<S> {
    /// All nodes in the tree.
    nodes: Vec<SearchNode<S>>,

    /// The root node ID.
    root: NodeId,
}

impl<S: ProblemState> SearchTree<S> {
    /// Create a new tree holding only a root node.
    pub fn new(root_state: S) -> Self {
        Self::with_capacity(root_state, 1024)
    }

    /// Create a tree with custom initial capacity.
    pub fn with_capacity(root_state: S, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(SearchNode::root(root_state));
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNode<S> {
        &self.nodes[id.index()]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<S> {
        &mut self.nodes[id.index()]
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &SearchNode<S> {
        self.get(self.root)
    }

    /// Children of a node, in expansion order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Attach a new node holding `state` below `parent`, returning its ID.
    pub fn add_child(&mut self, parent: NodeId, state: S) -> NodeId {
        let depth = self.get(parent).depth + 1;
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(SearchNode::new(state, parent, depth));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Credit one rollout's reward to `from` and every ancestor up to the root.
    pub fn backpropagate(&mut self, from: NodeId, reward: f64) {
        let mut current = from;
        while !current.is_none() {
            let node = self.get_mut(current);
            node.increment_visit();
            node.add_quality(reward);
            current = node.parent;
        }
    }

    /// Make `new_root` the root, dropping every node outside its subtree.
    ///
    /// Statistics inside the kept subtree are preserved; depths are
    /// rebased so the new root sits at depth 0. Returns how many nodes
    /// were released.
    pub fn reroot(&mut self, new_root: NodeId) -> usize {
        let before = self.nodes.len();
        let base_depth = self.get(new_root).depth;

        // Breadth-first order of the kept subtree defines the new layout.
        let mut order = vec![new_root];
        let mut cursor = 0;
        while cursor < order.len() {
            let id = order[cursor];
            order.extend(self.get(id).children.iter().copied());
            cursor += 1;
        }
        let remap: FxHashMap<NodeId, NodeId> = order
            .iter()
            .enumerate()
            .map(|(i, &old)| (old, NodeId::new(i as u32)))
            .collect();

        let mut slots: Vec<Option<SearchNode<S>>> = (0..order.len()).map(|_| None).collect();
        for (i, mut node) in std::mem::take(&mut self.nodes).into_iter().enumerate() {
            let Some(&new_id) = remap.get(&NodeId::new(i as u32)) else {
                continue;
            };
            // The old parent of the new root is outside the map.
            node.parent = remap.get(&node.parent).copied().unwrap_or(NodeId::NONE);
            node.children = node.children.iter().filter_map(|c| remap.get(c).copied()).collect();
            node.depth -= base_depth;
            slots[new_id.index()] = Some(node);
        }

        self.nodes = slots.into_iter().flatten().collect();
        self.root = NodeId::new(0);
        before - self.nodes.len()
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            node_count: self.nodes.len(),
            max_depth: self.nodes.iter().map(|n| n.depth).max().unwrap_or(0),
            terminal_count: self.nodes.iter().filter(|n| n.state.is_terminal()).count(),
            fully_expanded_count: self.nodes.iter().filter(|n| n.is_fully_expanded()).count(),
        }
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode<S>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }
}

/// Statistics about the search tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Maximum depth reached.
    pub max_depth: u32,

    /// Number of nodes holding a terminal state.
    pub terminal_count: usize,

    /// Number of nodes with one child per available choice.
    pub fully_expanded_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::drift::{DriftBuilder, DriftState};

    fn root_state() -> DriftState {
        DriftBuilder::new().build().unwrap()
    }

    #[test]
    fn test_tree_new() {
        let tree = SearchTree::new(root_state());

        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root(), NodeId::new(0));
        assert!(tree.root_node().parent.is_none());
    }

    #[test]
    fn test_add_child_links_both_ways() {
        let mut tree = SearchTree::new(root_state());
        let root = tree.root();

        let state = root_state().with_progress(1, 1);
        let child = tree.add_child(root, state.clone());

        assert_eq!(child, NodeId::new(1));
        assert_eq!(tree.get(child).parent, root);
        assert_eq!(tree.get(child).depth, 1);
        assert_eq!(tree.get(child).state, state);
        assert_eq!(tree.children(root), &[child]);
    }

    #[test]
    fn test_backpropagate_accumulates_to_root() {
        let mut tree = SearchTree::new(root_state());
        let root = tree.root();
        let a = tree.add_child(root, root_state().with_progress(1, 1));
        let b = tree.add_child(a, root_state().with_progress(3, 2));

        let rewards = [-2.0, -0.5, -1.25];
        for reward in rewards {
            tree.backpropagate(b, reward);
        }
        tree.backpropagate(a, -4.0);

        assert_eq!(tree.get(b).visits, 3);
        assert!((tree.get(b).quality - (-3.75)).abs() < 1e-12);
        assert_eq!(tree.get(a).visits, 4);
        assert!((tree.get(a).quality - (-7.75)).abs() < 1e-12);
        assert_eq!(tree.get(root).visits, 4);
        assert!((tree.get(root).quality - (-7.75)).abs() < 1e-12);
    }

    #[test]
    fn test_reroot_releases_siblings() {
        let mut tree = SearchTree::new(root_state());
        let root = tree.root();
        let keep = tree.add_child(root, root_state().with_progress(1, 1));
        let drop = tree.add_child(root, root_state().with_progress(-1, 1));
        let grandchild = tree.add_child(keep, root_state().with_progress(3, 2));
        tree.add_child(drop, root_state().with_progress(-3, 2));
        tree.backpropagate(grandchild, -2.0);

        let released = tree.reroot(keep);

        assert_eq!(released, 3);
        assert_eq!(tree.len(), 2);

        let new_root = tree.root_node();
        assert!(new_root.is_root());
        assert_eq!(new_root.depth, 0);
        assert_eq!(new_root.visits, 1);
        assert_eq!(new_root.state.value(), 1);
        assert_eq!(new_root.children.len(), 1);

        let child = tree.get(new_root.children[0]);
        assert_eq!(child.parent, tree.root());
        assert_eq!(child.depth, 1);
        assert_eq!(child.state.value(), 3);

        // Backpropagation now stops at the new root
        let child_id = tree.root_node().children[0];
        tree.backpropagate(child_id, -1.0);
        assert_eq!(tree.root_node().visits, 2);
    }

    #[test]
    fn test_tree_stats() {
        let rules = DriftBuilder::new().choices(vec![1, -1]).max_rounds(1);
        let root = rules.build().unwrap();
        let mut tree = SearchTree::new(root.clone());

        let r = tree.root();
        tree.add_child(r, root.with_progress(1, 1));
        tree.add_child(r, root.with_progress(-1, 1));

        let stats = tree.stats();
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.terminal_count, 2);
        assert_eq!(stats.fully_expanded_count, 1);
    }

    #[test]
    fn test_tree_iter() {
        let mut tree = SearchTree::new(root_state());
        let root = tree.root();
        tree.add_child(root, root_state().with_progress(2, 1));

        let nodes: Vec<_> = tree.iter().collect();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].0, NodeId::new(0));
        assert_eq!(nodes[1].0, NodeId::new(1));
    }
}
