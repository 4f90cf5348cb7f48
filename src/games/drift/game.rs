//! Drift game implementation.

use std::fmt;
use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{Result, SearchError, SearchRng};
use crate::rules::ProblemState;

/// Fixed parameters of a drift walk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftRules {
    /// Deltas available each round. The branching factor is their count.
    pub choices: Vec<i64>,
    /// Round index at which the walk ends.
    pub max_rounds: u32,
    /// Value the walk is rewarded for ending on.
    pub target: i64,
}

impl Default for DriftRules {
    fn default() -> Self {
        Self {
            choices: vec![1, -1, 2, -2],
            max_rounds: 10,
            target: 1,
        }
    }
}

impl DriftRules {
    /// Reject rule sets whose successors cannot all be told apart.
    pub fn validate(&self) -> Result<()> {
        if self.choices.is_empty() {
            return Err(SearchError::Config("drift needs at least one choice".to_string()));
        }
        let mut seen = self.choices.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != self.choices.len() {
            return Err(SearchError::Config(format!(
                "drift choices must be distinct, got {:?}",
                self.choices
            )));
        }
        Ok(())
    }
}

/// One point of a drift walk.
///
/// Cloning is cheap: rules are shared and the history is a persistent vector.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DriftState {
    #[serde(skip)]
    rules: Arc<DriftRules>,
    value: i64,
    round: u32,
    history: Vector<i64>,
}

impl DriftState {
    /// Current accumulated value.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Rounds played so far.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Choices made from the start, in order.
    #[must_use]
    pub fn history(&self) -> &Vector<i64> {
        &self.history
    }

    #[must_use]
    pub fn rules(&self) -> &DriftRules {
        &self.rules
    }

    /// A state under the same rules at an arbitrary value and round,
    /// with an empty history.
    #[cfg(test)]
    pub(crate) fn with_progress(&self, value: i64, round: u32) -> Self {
        assert!(round <= self.rules.max_rounds, "round {} past the horizon", round);
        Self {
            rules: Arc::clone(&self.rules),
            value,
            round,
            history: Vector::new(),
        }
    }
}

impl ProblemState for DriftState {
    fn is_terminal(&self) -> bool {
        self.round == self.rules.max_rounds
    }

    fn compute_reward(&self) -> Result<f64> {
        if !self.is_terminal() {
            return Err(SearchError::NotTerminal(format!(
                "drift at round {} of {}",
                self.round, self.rules.max_rounds
            )));
        }
        Ok(-((self.rules.target - self.value).abs() as f64))
    }

    fn next_state_with_random_choice(&self, rng: &mut SearchRng) -> Self {
        // Empty choice sets are rejected at build time; sampling one panics.
        let delta = self.rules.choices[rng.gen_range_usize(0..self.rules.choices.len())];
        let mut history = self.history.clone();
        history.push_back(delta);
        Self {
            rules: Arc::clone(&self.rules),
            value: self.value + delta,
            round: self.round + 1,
            history,
        }
    }

    fn branching_factor(&self) -> usize {
        self.rules.choices.len()
    }
}

impl fmt::Display for DriftState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value: {}, round: {}, choices: {:?}",
            self.value, self.round, self.history
        )
    }
}

/// Builder for the initial drift state.
#[derive(Clone, Debug, Default)]
pub struct DriftBuilder {
    rules: DriftRules,
}

impl DriftBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(mut self, rules: DriftRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn choices(mut self, choices: Vec<i64>) -> Self {
        self.rules.choices = choices;
        self
    }

    pub fn max_rounds(mut self, rounds: u32) -> Self {
        self.rules.max_rounds = rounds;
        self
    }

    pub fn target(mut self, target: i64) -> Self {
        self.rules.target = target;
        self
    }

    /// Validate the rules and build the state at value 0, round 0.
    pub fn build(self) -> Result<DriftState> {
        self.rules.validate()?;
        Ok(DriftState {
            rules: Arc::new(self.rules),
            value: 0,
            round: 0,
            history: Vector::new(),
        })
    }
}
