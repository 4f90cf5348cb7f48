//! Search configuration parameters.

use serde::{Deserialize, Serialize};

use crate::core::{Result, SearchError};

/// Search configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Select/expand, rollout, backpropagate iterations per decision.
    /// The default of 2 is only enough for a demonstration; real searches
    /// want hundreds to thousands.
    pub computation_budget: u32,

    /// UCB1 exploration constant (default: 1/sqrt(2) = 0.707).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Random seed for expansion and rollouts.
    /// Same seed produces deterministic searches.
    pub seed: u64,

    /// Successor draws allowed per available choice while looking for a
    /// state that is not already a child. A node with branching factor B
    /// gets `B * expansion_attempts_per_choice` draws. Running out is a
    /// domain definition error.
    pub expansion_attempts_per_choice: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            computation_budget: 2,
            exploration_constant: std::f64::consts::FRAC_1_SQRT_2,
            seed: 42,
            expansion_attempts_per_choice: 64,
        }
    }
}

impl SearchConfig {
    /// Create a new config with custom computation budget.
    pub fn with_budget(mut self, budget: u32) -> Self {
        self.computation_budget = budget;
        self
    }

    /// Create a new config with custom exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with a custom per-choice bound on expansion re-sampling.
    pub fn with_expansion_attempts(mut self, per_choice: u32) -> Self {
        self.expansion_attempts_per_choice = per_choice;
        self
    }

    /// Reject configurations the search loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.computation_budget == 0 {
            return Err(SearchError::InvalidBudget(self.computation_budget));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SearchError::Config(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if self.expansion_attempts_per_choice == 0 {
            return Err(SearchError::Config(
                "expansion_attempts_per_choice must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
