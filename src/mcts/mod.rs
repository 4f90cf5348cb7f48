//! Monte Carlo Tree Search with random rollouts.
//!
//! ## Overview
//!
//! Each iteration of the search:
//!
//! - **Selects** down the tree through fully expanded nodes by UCB1
//! - **Expands** the first node that still has untried choices
//! - **Rolls out** uniformly random choices from the new node to a terminal state
//! - **Backpropagates** the terminal reward to every ancestor
//!
//! After the computation budget is spent, the root child with the best
//! average reward is the decision. Committing to it makes it the new root
//! and releases the sibling subtrees.
//!
//! ## Usage
//!
//! ```rust
//! use rollout_mcts::games::drift::DriftBuilder;
//! use rollout_mcts::mcts::{MCTSSearch, SearchConfig};
//!
//! let root = DriftBuilder::new().build().unwrap();
//! let config = SearchConfig::default().with_budget(200).with_seed(7);
//! let mut search = MCTSSearch::new(root, config).unwrap();
//!
//! for decision in search.play(10).unwrap() {
//!     println!("{}", decision);
//! }
//! ```
//!
//! ## Custom Policies
//!
//! ```rust,ignore
//! use rollout_mcts::mcts::{IdentityEquality, MCTSSearch};
//!
//! let search = MCTSSearch::new(root, config)?
//!     .with_duplicates(IdentityEquality);  // never treat successors as repeats
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::SearchConfig;
pub use node::{NodeId, SearchNode};
pub use policy::{
    best_child, DuplicatePolicy, IdentityEquality, RandomRollout, Rollout, RolloutPolicy,
    SelectionPolicy, StructuralEquality, UCB1,
};
pub use search::{Decision, MCTSSearch};
pub use stats::SearchStats;
pub use tree::{SearchTree, TreeStats};
