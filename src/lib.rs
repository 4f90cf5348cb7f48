//! # rollout-mcts
//!
//! A generic Monte Carlo Tree Search engine for sequential decision
//! problems with a fixed number of choices per state.
//!
//! ## Design Principles
//!
//! 1. **Problem-Agnostic**: The engine knows nothing about the domain.
//!    Domains implement `ProblemState` and pass their branching factor and
//!    horizon through it, not through globals.
//!
//! 2. **Reproducible**: Every random draw comes from an injectable,
//!    seeded `SearchRng`. Same seed, same tree.
//!
//! 3. **Fail Fast**: Malformed budgets, unvisited nodes and domains that
//!    cannot produce novel successors are errors, never silently patched.
//!
//! ## Architecture
//!
//! - **Arena Tree**: Nodes live in a flat vector addressed by `NodeId`;
//!   parent links are indices, so there are no ownership cycles.
//!
//! - **Persistent Data Structures**: O(1) cloning of choice histories via
//!   `im-rs` keeps rollouts cheap.
//!
//! ## Modules
//!
//! - `core`: Errors and deterministic RNG
//! - `rules`: The `ProblemState` trait domains implement
//! - `mcts`: Tree, policies, and the search driver
//! - `games`: Reference domains

pub mod core;
pub mod rules;
pub mod mcts;
pub mod games;

// Re-export commonly used types
pub use crate::core::{Result, SearchError, SearchRng, SearchRngState};

pub use crate::rules::ProblemState;

pub use crate::mcts::{
    Decision, MCTSSearch, NodeId, SearchConfig, SearchNode, SearchStats, SearchTree, TreeStats,
    DuplicatePolicy, IdentityEquality, RandomRollout, Rollout, RolloutPolicy, SelectionPolicy,
    StructuralEquality, UCB1,
};

pub use crate::games::drift::{DriftBuilder, DriftRules, DriftState};
