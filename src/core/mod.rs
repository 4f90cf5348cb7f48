//! Core engine types: errors and deterministic randomness.
//!
//! Everything here is problem-agnostic. Problem domains plug in through
//! [`crate::rules::ProblemState`] and draw all randomness from [`SearchRng`].

pub mod error;
pub mod rng;

pub use error::{Result, SearchError};
pub use rng::{SearchRng, SearchRngState};
