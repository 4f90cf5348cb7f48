//! Core search driver.
//!
//! Each iteration runs the tree policy from the root to a leaf (expanding
//! one new node when it meets a node with untried choices), plays a random
//! rollout from that leaf, and backpropagates the reward to the root. After
//! the budget is spent the best root child by pure exploitation is the
//! decision.

use std::time::Instant;

use serde::Serialize;

use crate::core::{Result, SearchError, SearchRng};
use crate::rules::ProblemState;

use super::config::SearchConfig;
use super::node::NodeId;
use super::policy::{
    best_child, DuplicatePolicy, RandomRollout, RolloutPolicy, SelectionPolicy,
    StructuralEquality, UCB1,
};
use super::stats::SearchStats;
use super::tree::SearchTree;

/// A committed decision: the chosen root child and its statistics at the
/// time it was chosen.
#[derive(Clone, Debug, Serialize)]
pub struct Decision<S> {
    pub state: S,
    pub visits: u32,
    pub quality: f64,
}

impl<S> Decision<S> {
    /// Average backpropagated reward of the chosen child.
    #[must_use]
    pub fn mean_quality(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.quality / self.visits as f64
        }
    }
}

impl<S: std::fmt::Display> std::fmt::Display for Decision<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Q/N: {:.3}/{} ({:.3}), {}",
            self.quality,
            self.visits,
            self.mean_quality(),
            self.state
        )
    }
}

/// Main search context.
///
/// Generic over the problem state. Owns the persistent search tree, the
/// configuration, and the random source.
pub struct MCTSSearch<S: ProblemState> {
    /// Search configuration.
    config: SearchConfig,

    /// The search tree, rooted at the current decision point.
    tree: SearchTree<S>,

    /// RNG for expansion; rollouts use forks of it.
    rng: SearchRng,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy>,

    /// Rollout policy.
    rollout: Box<dyn RolloutPolicy<S>>,

    /// Duplicate successor check used during expansion.
    duplicates: Box<dyn DuplicatePolicy<S>>,

    /// Statistics of the most recent search.
    stats: SearchStats,
}

impl<S: ProblemState + 'static> MCTSSearch<S> {
    /// Create a search rooted at `root`.
    ///
    /// Fails if the configuration is malformed.
    pub fn new(root: S, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: SearchRng::new(config.seed),
            tree: SearchTree::new(root),
            config,
            selection: Box::new(UCB1),
            rollout: Box::new(RandomRollout),
            duplicates: Box::new(StructuralEquality),
            stats: SearchStats::default(),
        })
    }

    /// Set a custom selection policy.
    pub fn with_selection<P: SelectionPolicy + 'static>(mut self, selection: P) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom rollout policy.
    pub fn with_rollout<P: RolloutPolicy<S> + 'static>(mut self, rollout: P) -> Self {
        self.rollout = Box::new(rollout);
        self
    }

    /// Set a custom duplicate check for expansion.
    pub fn with_duplicates<P: DuplicatePolicy<S> + 'static>(mut self, duplicates: P) -> Self {
        self.duplicates = Box::new(duplicates);
        self
    }

    /// Replace the random source, e.g. to resume from a checkpoint.
    pub fn with_rng(mut self, rng: SearchRng) -> Self {
        self.rng = rng;
        self
    }

    /// Run the configured number of iterations and return the best root child.
    pub fn search(&mut self) -> Result<NodeId> {
        self.search_with_budget(self.config.computation_budget)
    }

    /// Run `budget` iterations and return the best root child by pure
    /// exploitation.
    pub fn search_with_budget(&mut self, budget: u32) -> Result<NodeId> {
        if budget == 0 {
            return Err(SearchError::InvalidBudget(budget));
        }
        if self.tree.root_node().state.is_terminal() {
            return Err(SearchError::TerminalRoot);
        }

        let start = Instant::now();
        self.stats.reset();

        for _ in 0..budget {
            self.iteration()?;
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;

        let best = self.best_child(self.tree.root(), false)?;
        log::debug!(
            "search: {} iterations, {} expanded, {} nodes, chose {} ({}us)",
            self.stats.iterations,
            self.stats.nodes_expanded,
            self.tree.len(),
            best,
            self.stats.time_us
        );
        Ok(best)
    }

    /// Single iteration: select/expand, rollout, backpropagate.
    fn iteration(&mut self) -> Result<()> {
        let leaf = self.tree_policy(self.tree.root())?;
        let reward = self.default_policy(leaf)?;
        self.tree.backpropagate(leaf, reward);
        self.stats.iterations += 1;
        log::trace!("iteration {}: leaf {} reward {}", self.stats.iterations, leaf, reward);
        Ok(())
    }

    /// Descend through fully expanded nodes by UCB1 and expand the first
    /// node with untried choices. Terminal nodes are returned as they are.
    fn tree_policy(&mut self, start: NodeId) -> Result<NodeId> {
        let mut current = start;
        while !self.tree.get(current).state.is_terminal() {
            if self.tree.get(current).is_fully_expanded() {
                current = self.best_child(current, true)?;
            } else {
                return self.expand(current);
            }
        }
        Ok(current)
    }

    /// Attach one new successor of `node`, re-sampling over duplicates.
    fn expand(&mut self, node: NodeId) -> Result<NodeId> {
        let attempts = self.expansion_attempts(node);

        for _ in 0..attempts {
            let candidate = self
                .tree
                .get(node)
                .state
                .next_state_with_random_choice(&mut self.rng);
            let duplicate = self
                .tree
                .children(node)
                .iter()
                .any(|&c| self.duplicates.is_duplicate(&candidate, &self.tree.get(c).state));
            if duplicate {
                self.stats.expansion_retries += 1;
                continue;
            }

            let child = self.tree.add_child(node, candidate);
            let depth = self.tree.get(child).depth;
            if depth > self.stats.max_depth {
                self.stats.max_depth = depth;
            }
            self.stats.nodes_expanded += 1;
            log::trace!("expanded {} under {}", child, node);
            return Ok(child);
        }

        Err(SearchError::ExpansionExhausted { node, attempts })
    }

    /// Draw bound for expanding `node`, scaled by its branching factor.
    ///
    /// Sampling the last untried choice uniformly takes B draws on average.
    fn expansion_attempts(&self, node: NodeId) -> u32 {
        let branching = self.tree.get(node).state.branching_factor().max(1);
        u32::try_from(branching)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.config.expansion_attempts_per_choice)
    }

    /// Random rollout from the leaf's state, on a forked random stream.
    fn default_policy(&mut self, leaf: NodeId) -> Result<f64> {
        let mut rollout_rng = self.rng.fork();
        let outcome = self.rollout.rollout(&self.tree.get(leaf).state, &mut rollout_rng)?;
        self.stats.rollouts += 1;
        self.stats.rollout_depth_total += u64::from(outcome.depth);
        Ok(outcome.reward)
    }

    /// Best child of `node`, with the exploration bonus or without it.
    pub fn best_child(&self, node: NodeId, exploration: bool) -> Result<NodeId> {
        let c = if exploration {
            self.config.exploration_constant
        } else {
            0.0
        };
        best_child(&self.tree, node, self.selection.as_ref(), c)
    }

    /// Commit to a root child: it becomes the new root and every sibling
    /// subtree is released.
    pub fn commit(&mut self, child: NodeId) -> Result<Decision<S>> {
        let root = self.tree.root();
        if !self.tree.children(root).contains(&child) {
            return Err(SearchError::NotRootChild(child));
        }

        let node = self.tree.get(child);
        let decision = Decision {
            state: node.state.clone(),
            visits: node.visits,
            quality: node.quality,
        };

        let released = self.tree.reroot(child);
        log::debug!("committed {}, released {} nodes", child, released);
        Ok(decision)
    }

    /// Search from the current root and commit to the result.
    pub fn step(&mut self) -> Result<Decision<S>> {
        let best = self.search()?;
        self.commit(best)
    }

    /// Make up to `rounds` consecutive decisions, stopping early once the
    /// root is terminal.
    pub fn play(&mut self, rounds: u32) -> Result<Vec<Decision<S>>> {
        let mut decisions = Vec::with_capacity(rounds as usize);
        for round in 1..=rounds {
            if self.tree.root_node().state.is_terminal() {
                log::info!("root is terminal after {} decisions", decisions.len());
                break;
            }
            let decision = self.step()?;
            log::info!("round {}: chose {:?}", round, decision);
            decisions.push(decision);
        }
        Ok(decisions)
    }

    /// Get statistics of the most recent search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the search tree.
    #[must_use]
    pub fn tree(&self) -> &SearchTree<S> {
        &self.tree
    }

    /// Get the configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Get the random source, e.g. to checkpoint it.
    pub fn rng(&self) -> &SearchRng {
        &self.rng
    }
}
