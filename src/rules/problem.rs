//! The problem-state contract consumed by the search engine.

use std::fmt::Debug;

use crate::core::{Result, SearchRng};

/// One decision point of a sequential decision problem.
///
/// States are immutable once produced: every transition builds a new
/// state rather than mutating the receiver.
///
/// ## Implementation Notes
///
/// - `next_state_with_random_choice`: advance exactly one round, drawing
///   all randomness from `rng` so searches are reproducible
/// - `compute_reward`: only defined on terminal states, return
///   [`SearchError::NotTerminal`](crate::core::SearchError::NotTerminal) otherwise
/// - `branching_factor`: the fixed count of distinct choices; a node is
///   fully expanded once it has this many children
/// - `PartialEq` backs the default duplicate check during expansion, so
///   distinct choices must yield unequal successors
pub trait ProblemState: Clone + Debug + PartialEq {
    /// Check if no further choices can be made.
    fn is_terminal(&self) -> bool;

    /// Reward of a terminal state.
    fn compute_reward(&self) -> Result<f64>;

    /// Produce a new state one round later, via a uniformly random choice.
    fn next_state_with_random_choice(&self, rng: &mut SearchRng) -> Self;

    /// Number of distinct choices available at any non-terminal state.
    fn branching_factor(&self) -> usize;
}
