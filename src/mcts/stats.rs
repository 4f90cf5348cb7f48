//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during one call to search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Total iterations performed.
    pub iterations: u32,

    /// Nodes expanded (added to tree).
    pub nodes_expanded: u32,

    /// Rollouts performed.
    pub rollouts: u32,

    /// Successor draws rejected as duplicates of an existing child.
    pub expansion_retries: u32,

    /// Random transitions taken across all rollouts.
    pub rollout_depth_total: u64,

    /// Maximum tree depth reached during search.
    pub max_depth: u32,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Calculate iterations per second.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Average rollout length.
    #[must_use]
    pub fn avg_rollout_depth(&self) -> f64 {
        if self.rollouts == 0 {
            0.0
        } else {
            self.rollout_depth_total as f64 / self.rollouts as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = SearchStats::new();
        assert_eq!(stats.iterations, 0);
        assert_eq!(stats.rollouts, 0);
        assert_eq!(stats.avg_rollout_depth(), 0.0);
    }

    #[test]
    fn test_stats_rates() {
        let mut stats = SearchStats::new();
        stats.iterations = 1000;
        stats.time_us = 1_000_000;
        stats.rollouts = 4;
        stats.rollout_depth_total = 30;

        assert_eq!(stats.iterations_per_second(), 1000.0);
        assert_eq!(stats.avg_rollout_depth(), 7.5);
    }

    #[test]
    fn test_stats_reset() {
        let mut stats = SearchStats::new();
        stats.iterations = 100;
        stats.expansion_retries = 5;

        stats.reset();

        assert_eq!(stats, SearchStats::default());
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = SearchStats::new();
        stats.iterations = 42;

        let json = serde_json::to_string(&stats).unwrap();
        let deserialized: SearchStats = serde_json::from_str(&json).unwrap();

        assert_eq!(stats, deserialized);
    }
}
