//! Search policies for selection, rollouts, and duplicate detection.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: How to score children during descent (UCB1)
//! - `RolloutPolicy`: How to play out a state to a reward (random)
//! - `DuplicatePolicy`: When a freshly sampled successor repeats an existing child

use crate::core::{Result, SearchError, SearchRng};
use crate::rules::ProblemState;

use super::node::NodeId;
use super::tree::SearchTree;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for scoring a child during best-child selection.
pub trait SelectionPolicy: Send + Sync {
    /// Score a visited child of a visited parent.
    ///
    /// `exploration` is the exploration constant, 0 for pure exploitation.
    fn score(&self, quality: f64, visits: u32, parent_visits: u32, exploration: f64) -> f64;
}

/// UCB1 (Upper Confidence Bound) selection policy.
///
/// Formula: Q/n + c * sqrt(2 * ln(N) / n)
#[derive(Clone, Debug, Default)]
pub struct UCB1;

impl SelectionPolicy for UCB1 {
    fn score(&self, quality: f64, visits: u32, parent_visits: u32, exploration: f64) -> f64 {
        let visits = visits as f64;
        let exploitation = quality / visits;
        if exploration == 0.0 {
            return exploitation;
        }
        let bonus = (2.0 * (parent_visits as f64).ln() / visits).sqrt();
        exploitation + exploration * bonus
    }
}

/// Pick the highest-scoring child of `node`.
///
/// Ties keep the first child in expansion order. Every child and the
/// node itself must have been visited; anything else is an invariant
/// violation and aborts the search.
pub fn best_child<S: ProblemState>(
    tree: &SearchTree<S>,
    node: NodeId,
    policy: &dyn SelectionPolicy,
    exploration: f64,
) -> Result<NodeId> {
    let parent = tree.get(node);
    if parent.children.is_empty() {
        return Err(SearchError::NoChildren(node));
    }
    if parent.visits == 0 {
        return Err(SearchError::UnvisitedParent(node));
    }

    let mut best: Option<(NodeId, f64)> = None;
    for &child_id in &parent.children {
        let child = tree.get(child_id);
        if child.visits == 0 {
            return Err(SearchError::UnvisitedChild {
                parent: node,
                child: child_id,
            });
        }
        let score = policy.score(child.quality, child.visits, parent.visits, exploration);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((child_id, score));
        }
    }

    best.map(|(id, _)| id).ok_or(SearchError::NoChildren(node))
}

// =============================================================================
// Rollout Policy
// =============================================================================

/// Outcome of a single rollout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rollout {
    /// Reward of the terminal state reached.
    pub reward: f64,

    /// Random transitions taken to get there.
    pub depth: u32,
}

/// Policy for running rollouts from a leaf of the tree.
pub trait RolloutPolicy<S: ProblemState>: Send + Sync {
    /// Play out `state` to a terminal state and report its reward.
    ///
    /// Intermediate states are discarded; the tree is not touched.
    fn rollout(&self, state: &S, rng: &mut SearchRng) -> Result<Rollout>;
}

/// Random rollout policy.
///
/// Takes uniformly random choices until the state is terminal.
#[derive(Clone, Debug, Default)]
pub struct RandomRollout;

impl<S: ProblemState> RolloutPolicy<S> for RandomRollout {
    fn rollout(&self, state: &S, rng: &mut SearchRng) -> Result<Rollout> {
        if state.is_terminal() {
            return Ok(Rollout {
                reward: state.compute_reward()?,
                depth: 0,
            });
        }

        let mut current = state.next_state_with_random_choice(rng);
        let mut depth = 1;
        while !current.is_terminal() {
            current = current.next_state_with_random_choice(rng);
            depth += 1;
        }

        Ok(Rollout {
            reward: current.compute_reward()?,
            depth,
        })
    }
}

// =============================================================================
// Duplicate Policy
// =============================================================================

/// Policy deciding whether a sampled successor is already a child.
pub trait DuplicatePolicy<S>: Send + Sync {
    fn is_duplicate(&self, candidate: &S, existing: &S) -> bool;
}

/// States are duplicates when they compare equal by value.
#[derive(Clone, Debug, Default)]
pub struct StructuralEquality;

impl<S: PartialEq> DuplicatePolicy<S> for StructuralEquality {
    fn is_duplicate(&self, candidate: &S, existing: &S) -> bool {
        candidate == existing
    }
}

/// Every generated state is distinct, even when equal by value.
///
/// Expansion then accepts the first sample, so two children may hold
/// the same choice.
#[derive(Clone, Debug, Default)]
pub struct IdentityEquality;

impl<S> DuplicatePolicy<S> for IdentityEquality {
    fn is_duplicate(&self, _candidate: &S, _existing: &S) -> bool {
        false
    }
}
