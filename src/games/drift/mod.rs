//! Drift: a scalar walk toward a target.
//!
//! A minimal domain that exercises the search:
//! - The state is a running value, starting at 0
//! - Each round adds one of a fixed set of deltas (default `+1, -1, +2, -2`)
//! - After a fixed number of rounds (default 10) the walk ends
//! - The reward is the negative distance between the final value and the target (default 1)

mod game;

pub use game::{DriftBuilder, DriftRules, DriftState};
